//! Base response recorder.
//!
//! [`ResponseRecorder`] stands in for the response side of an HTTP server: a
//! handler writes its status, headers and body into it, and the test inspects
//! them afterwards, either directly or through [`ResponseRecorder::result`].

use std::io::Write;

use crate::body::Body;
use crate::headers::{canonical_header_key, Headers};
use crate::sniff::detect_content_type;
use crate::status::{is_valid_code, status_text};
use crate::traits::ResponseWriter;

/// Header name prefix that declares a trailer without listing it in `Trailer`.
pub const TRAILER_PREFIX: &str = "Trailer:";

const DEFAULT_STATUS: u16 = 200;

// Headers that must not travel as trailers.
const FORBIDDEN_TRAILERS: &[&str] = &[
    "Authorization",
    "Cache-Control",
    "Connection",
    "Content-Encoding",
    "Content-Length",
    "Content-Range",
    "Content-Type",
    "Expect",
    "Host",
    "Keep-Alive",
    "Max-Forwards",
    "Pragma",
    "Proxy-Authenticate",
    "Proxy-Authorization",
    "Proxy-Connection",
    "Range",
    "Realm",
    "Te",
    "Trailer",
    "Transfer-Encoding",
    "Www-Authenticate",
];

// Conditional request headers (`If-Match`, `If-None-Match`, ...) never qualify either.
fn is_allowed_trailer(canonical_name: &str) -> bool {
    !canonical_name.is_empty()
        && !canonical_name.starts_with("If-")
        && !FORBIDDEN_TRAILERS.contains(&canonical_name)
}

/// Records everything a handler writes to its response.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    code: Option<u16>,
    headers: Headers,
    body: Body,
    flushed: bool,
    wrote_header: bool,
    // Headers as they were when the header was committed.
    snapshot: Option<Headers>,
}

impl ResponseRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder writing into an existing shared body.
    #[must_use]
    pub fn with_body(body: Body) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    /// Shared handle to the body buffer.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Last status code recorded, `None` until one is set or implied by a write.
    #[must_use]
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    #[must_use]
    pub fn flushed(&self) -> bool {
        self.flushed
    }

    /// Same as [`ResponseWriter::headers`], kept for callers of the older name.
    #[must_use]
    pub fn header_map(&self) -> &Headers {
        &self.headers
    }

    /// Builds the response a client would have received.
    ///
    /// Headers are the ones in place when the header was committed (first status
    /// or body write), so later header edits do not show up, matching what a real
    /// server would have sent.
    #[must_use]
    pub fn result(&self) -> RecordedResponse {
        let headers = self
            .snapshot
            .clone()
            .unwrap_or_else(|| self.headers.clone());

        let status = self.code.unwrap_or(DEFAULT_STATUS);
        let content_length = headers
            .get("Content-Length")
            .and_then(|value| value.trim().parse::<u64>().ok());
        let trailers = self.collect_trailers(&headers);

        RecordedResponse {
            proto: "HTTP/1.1",
            status,
            status_line: format!("{status:03} {}", status_text(status)),
            headers,
            body: self.body.to_vec(),
            content_length,
            trailers,
        }
    }

    fn collect_trailers(&self, committed: &Headers) -> Headers {
        let mut trailers = Headers::new();

        let declared = committed
            .get_all("Trailer")
            .unwrap_or_default()
            .iter()
            .flat_map(|value| value.split(','))
            .map(|name| canonical_header_key(name.trim()))
            .filter(|name| is_allowed_trailer(name));

        // A name declared twice still maps to one copy of its values.
        for name in declared {
            if let Some(values) = self.headers.get_all(&name) {
                trailers.set_all(&name, values.to_vec());
            }
        }

        for (name, values) in &self.headers {
            let Some(trailer) = name.strip_prefix(TRAILER_PREFIX) else {
                continue;
            };
            for value in values {
                trailers.add(trailer, value.clone());
            }
        }

        trailers
    }

    // Commits the header ahead of the first body bytes, picking a Content-Type
    // from the data when the handler did not set one.
    fn commit_for_body(&mut self, data: &[u8]) {
        if self.wrote_header {
            return;
        }

        if !self.headers.contains("Content-Type") && !self.headers.contains("Transfer-Encoding") {
            self.headers.set("Content-Type", detect_content_type(data));
        }

        self.write_header(DEFAULT_STATUS);
    }
}

impl ResponseWriter for ResponseRecorder {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Records `code`; the last call wins. The first call commits the header.
    ///
    /// # Panics
    ///
    /// If `code` is not a three-digit status code.
    fn write_header(&mut self, code: u16) {
        assert!(is_valid_code(code), "invalid status code {code}");

        if self.wrote_header {
            debug!(
                "write_header called again after commit: {:?} -> {}",
                self.code, code
            );
            self.code = Some(code);
            return;
        }

        self.code = Some(code);
        self.wrote_header = true;
        self.snapshot = Some(self.headers.clone());
    }
}

impl Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.commit_for_body(buf);
        self.body.extend(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.wrote_header {
            self.write_header(DEFAULT_STATUS);
        }
        self.flushed = true;
        Ok(())
    }
}

/// The response synthesized from a recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedResponse {
    pub proto: &'static str,
    /// Recorded status, `200` when none was recorded
    pub status: u16,
    /// Status code and reason phrase, e.g. `"101 Switching Protocols"`
    pub status_line: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// Parsed `Content-Length` header, `None` when absent or malformed
    pub content_length: Option<u64>,
    pub trailers: Headers,
}

impl RecordedResponse {
    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
