//! Capabilities a handler under test is written against.

use std::io::{Read, Write};
use std::net::SocketAddr;
use std::time::Instant;

use crate::errors::HijackResult;
use crate::headers::Headers;

/// Destination of an HTTP response.
///
/// Body bytes go through [`Write::write`]; [`Write::flush`] flushes the response
/// (committing an implicit `200` if nothing was committed yet).
pub trait ResponseWriter: Write {
    fn headers(&self) -> &Headers;

    /// Headers to send. Changes made after the header is committed are not part
    /// of the response the client sees.
    fn headers_mut(&mut self) -> &mut Headers;

    /// Records the status code.
    fn write_header(&mut self, code: u16);

    /// Writes `text` to the body.
    ///
    /// # Errors
    ///
    /// Whatever the underlying writer reports.
    fn write_string(&mut self, text: &str) -> std::io::Result<usize> {
        self.write(text.as_bytes())
    }
}

/// A response writer that can hand over its raw connection.
pub trait Hijacker {
    type Conn: Conn;
    type ReadWriter: Read + Write;

    /// Takes over the connection behind the response.
    ///
    /// Once hijacked, the caller owns the byte stream and the HTTP layer must
    /// not write to it.
    ///
    /// # Errors
    ///
    /// [`crate::HijackError`] when the connection cannot be handed out.
    fn hijack(&mut self) -> HijackResult<(Self::Conn, Self::ReadWriter)>;
}

/// A raw, stream-oriented connection.
#[allow(clippy::missing_errors_doc)]
pub trait Conn: Read + Write {
    fn close(&mut self) -> std::io::Result<()>;

    fn local_addr(&self) -> SocketAddr;

    fn remote_addr(&self) -> SocketAddr;

    /// Sets both read and write deadlines. `None` clears them.
    fn set_deadline(&mut self, deadline: Option<Instant>) -> std::io::Result<()> {
        self.set_read_deadline(deadline)?;
        self.set_write_deadline(deadline)
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> std::io::Result<()>;

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> std::io::Result<()>;
}
