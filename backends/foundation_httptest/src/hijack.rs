//! Response recorder that supports connection hijacking.
//!
//! WHY: Handlers that upgrade a connection (WebSocket, HTTP/1.1 `Upgrade`) stop
//! talking HTTP and drive the raw socket themselves. Testing them needs a response
//! writer that can hand that socket out.
//!
//! WHAT: [`HijackableResponseRecorder`] records like [`ResponseRecorder`] and, on
//! [`Hijacker::hijack`], returns a [`MockConn`] plus a buffered
//! [`HijackedReadWriter`].
//!
//! HOW: Everything written after the hijack goes into the same [`Body`] as the
//! ordinary response writes, so `body()` shows the whole exchange in order. Reads
//! come from the bytes given at construction, then report end-of-input.

use std::io::{Read, Write};

use crate::body::Body;
use crate::config::RecorderConfig;
use crate::errors::HijackResult;
use crate::headers::Headers;
use crate::mockconn::{MockConn, SharedReader, SharedWriter};
use crate::recorder::{RecordedResponse, ResponseRecorder};
use crate::traits::{Hijacker, ResponseWriter};

/// [`ResponseRecorder`] that can also be hijacked.
///
/// # Examples
///
/// ```rust
/// use std::io::Write;
/// use foundation_httptest::{HijackableResponseRecorder, ResponseWriter};
///
/// let mut recorder = HijackableResponseRecorder::default();
/// recorder.write_string("hello").unwrap();
/// recorder.flush().unwrap();
///
/// assert_eq!(recorder.body(), "hello");
/// assert!(recorder.flushed());
/// ```
#[derive(Debug)]
pub struct HijackableResponseRecorder {
    wrapped: ResponseRecorder,
    input: SharedReader,
    output: SharedWriter,
    conn: MockConn<Body, SharedReader>,
    hijacked: bool,
}

impl HijackableResponseRecorder {
    /// Creates a recorder whose hijacked connection will receive `input`.
    ///
    /// `input` may be empty, in which case reads after hijacking report
    /// end-of-input straight away.
    #[must_use]
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self::with_config(RecorderConfig::new().input(input))
    }

    #[must_use]
    pub fn with_config(config: RecorderConfig) -> Self {
        let wrapped = ResponseRecorder::new();
        let body = wrapped.body().clone();

        let local_addr = config.get_local_addr();
        let remote_addr = config.get_remote_addr();
        let output = SharedWriter::new(body.clone(), config.get_writer_capacity());
        let input = SharedReader::new(config.into_input());
        let conn = MockConn::new(body, input.clone()).with_addrs(local_addr, remote_addr);

        Self {
            wrapped,
            input,
            output,
            conn,
            hijacked: false,
        }
    }

    /// Shared handle to everything written, before and after the hijack.
    #[must_use]
    pub fn body(&self) -> &Body {
        self.wrapped.body()
    }

    #[must_use]
    pub fn code(&self) -> Option<u16> {
        self.wrapped.code()
    }

    #[must_use]
    pub fn flushed(&self) -> bool {
        self.wrapped.flushed()
    }

    #[must_use]
    pub fn header_map(&self) -> &Headers {
        self.wrapped.header_map()
    }

    /// Whether the hijacked connection has been closed.
    #[must_use]
    pub fn closed(&self) -> bool {
        self.conn.closed()
    }

    /// Whether [`Hijacker::hijack`] has been called.
    #[must_use]
    pub fn hijacked(&self) -> bool {
        self.hijacked
    }

    #[must_use]
    pub fn result(&self) -> RecordedResponse {
        self.wrapped.result()
    }
}

impl Default for HijackableResponseRecorder {
    fn default() -> Self {
        Self::with_config(RecorderConfig::default())
    }
}

impl ResponseWriter for HijackableResponseRecorder {
    fn headers(&self) -> &Headers {
        self.wrapped.headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.wrapped.headers_mut()
    }

    fn write_header(&mut self, code: u16) {
        if self.hijacked {
            warn!("write_header({}) on a hijacked response", code);
        }
        self.wrapped.write_header(code);
    }
}

// Writes after a hijack are not rejected: they land in the shared body between
// whatever the hijacked stream wrote.
impl Write for HijackableResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.hijacked {
            warn!("{} byte response write on a hijacked response", buf.len());
        }
        self.wrapped.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.wrapped.flush()
    }
}

impl Hijacker for HijackableResponseRecorder {
    type Conn = MockConn<Body, SharedReader>;
    type ReadWriter = HijackedReadWriter;

    /// Hands out the mock connection and a buffered stream over it.
    ///
    /// Never fails. Calling it again returns handles over the same streams.
    fn hijack(&mut self) -> HijackResult<(Self::Conn, Self::ReadWriter)> {
        info!(
            "hijacking response, {} input bytes available",
            self.input.remaining()
        );
        self.hijacked = true;

        Ok((
            self.conn.clone(),
            HijackedReadWriter::new(self.input.clone(), self.output.clone()),
        ))
    }
}

/// Buffered reader/writer pair returned by a hijack.
///
/// Reads drain the input the recorder was created with. Writes are buffered and
/// reach the recorder body on [`Write::flush`] or when the buffer fills up.
///
/// The read position is shared with the hijacked connection, so this type does
/// not implement [`std::io::BufRead`]: a `fill_buf` read-ahead would hide bytes
/// from the connection. Use [`Self::read_line`] and [`Self::read_until`] for
/// delimited reads.
#[derive(Debug, Clone)]
pub struct HijackedReadWriter {
    reader: SharedReader,
    writer: SharedWriter,
}

impl HijackedReadWriter {
    #[must_use]
    pub fn new(reader: SharedReader, writer: SharedWriter) -> Self {
        Self { reader, writer }
    }

    pub fn reader(&mut self) -> &mut SharedReader {
        &mut self.reader
    }

    pub fn writer(&mut self) -> &mut SharedWriter {
        &mut self.writer
    }

    #[must_use]
    pub fn into_parts(self) -> (SharedReader, SharedWriter) {
        (self.reader, self.writer)
    }

    /// Reads one line, including its `\n`, from the input.
    ///
    /// # Errors
    ///
    /// If the line is not valid UTF-8.
    pub fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize> {
        self.reader.read_line(buf)
    }

    /// Reads up to and including the next `delimiter` from the input.
    ///
    /// Returns `Ok(0)` once the input is drained.
    ///
    /// # Errors
    ///
    /// Never fails for the in-memory input.
    pub fn read_until(&mut self, delimiter: u8, buf: &mut Vec<u8>) -> std::io::Result<usize> {
        self.reader.read_until(delimiter, buf)
    }
}

impl Read for HijackedReadWriter {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for HijackedReadWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
