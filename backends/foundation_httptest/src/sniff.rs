//! Content-Type detection for response bodies written without one.

const SNIFF_LEN: usize = 512;

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

const EXACT_SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF", TEXT_PLAIN_UTF8),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"BM", "image/bmp"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x00asm", "application/wasm"),
];

/// Detects the MIME type of `data` from at most its first 512 bytes.
///
/// Always returns a valid type, falling back to `application/octet-stream`.
#[must_use]
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let trimmed = &data[first_non_whitespace(data)..];

    if HTML_TAGS.iter().any(|tag| matches_html_tag(trimmed, tag)) {
        return "text/html; charset=utf-8";
    }

    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if let Some((_, mime)) = EXACT_SIGNATURES
        .iter()
        .find(|(signature, _)| data.starts_with(signature))
    {
        return *mime;
    }

    if trimmed.iter().any(|b| is_binary_byte(*b)) {
        return OCTET_STREAM;
    }

    TEXT_PLAIN_UTF8
}

fn first_non_whitespace(data: &[u8]) -> usize {
    data.iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len())
}

fn starts_with_ignore_case(data: &[u8], upper_prefix: &[u8]) -> bool {
    data.len() >= upper_prefix.len()
        && data
            .iter()
            .zip(upper_prefix)
            .all(|(b, p)| b.to_ascii_uppercase() == *p)
}

// The tag must be followed by a space or `>` so `<Bold` is not `<B`.
fn matches_html_tag(data: &[u8], tag: &[u8]) -> bool {
    starts_with_ignore_case(data, tag) && matches!(data.get(tag.len()), Some(b' ' | b'>'))
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
