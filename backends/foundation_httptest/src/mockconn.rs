//! Memory-backed connection used in place of a hijacked socket.
//!
//! [`MockConn`] reads from one stream and writes to another, and remembers whether
//! it was closed. [`SharedReader`] and [`SharedWriter`] are the buffered handles a
//! recorder shares between its connection and the streams it hands out on hijack.

use std::cell::{Cell, RefCell};
use std::io::{BufRead, BufWriter, Cursor, Read, Write};
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Instant;

use crate::body::Body;
use crate::config::LOOPBACK;
use crate::traits::Conn;

/// A connection whose reads come from `R` and whose writes go to `W`.
///
/// Clones share the closed flag: closing any clone closes them all.
#[derive(Debug, Clone)]
pub struct MockConn<W, R> {
    out: W,
    input: R,
    closed: Rc<Cell<bool>>,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl<W: Write, R: Read> MockConn<W, R> {
    /// Creates an open connection writing into `out` and reading from `input`.
    #[must_use]
    pub fn new(out: W, input: R) -> Self {
        Self {
            out,
            input,
            closed: Rc::new(Cell::new(false)),
            local_addr: LOOPBACK,
            remote_addr: LOOPBACK,
        }
    }

    #[must_use]
    pub fn with_addrs(mut self, local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        self.local_addr = local_addr;
        self.remote_addr = remote_addr;
        self
    }

    /// Whether [`Conn::close`] was called on this connection or any clone of it.
    #[must_use]
    pub fn closed(&self) -> bool {
        self.closed.get()
    }
}

// Reads and writes keep going through after close, so a test can still see what a
// handler attempted once it had closed the connection.
impl<W: Write, R: Read> Read for MockConn<W, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl<W: Write, R: Read> Write for MockConn<W, R> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write, R: Read> Conn for MockConn<W, R> {
    fn close(&mut self) -> std::io::Result<()> {
        if !self.closed.replace(true) {
            info!("mock connection to {} closed", self.remote_addr);
        }
        Ok(())
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    fn set_read_deadline(&mut self, deadline: Option<Instant>) -> std::io::Result<()> {
        debug!("ignoring read deadline {:?} on mock connection", deadline);
        Ok(())
    }

    fn set_write_deadline(&mut self, deadline: Option<Instant>) -> std::io::Result<()> {
        debug!("ignoring write deadline {:?} on mock connection", deadline);
        Ok(())
    }
}

/// Shared, buffered view of the bytes a simulated peer sends.
///
/// Every clone consumes from the same position.
#[derive(Debug, Clone, Default)]
pub struct SharedReader(Rc<RefCell<Cursor<Vec<u8>>>>);

impl SharedReader {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self(Rc::new(RefCell::new(Cursor::new(data.into()))))
    }

    /// Number of bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> usize {
        let cursor = self.0.borrow();
        let position = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
        cursor.get_ref().len().saturating_sub(position)
    }

    /// Reads up to and including the next `\n` into `buf`.
    ///
    /// # Errors
    ///
    /// If the bytes read are not valid UTF-8.
    pub fn read_line(&self, buf: &mut String) -> std::io::Result<usize> {
        self.0.borrow_mut().read_line(buf)
    }

    /// Reads up to and including the next `delimiter` into `buf`.
    ///
    /// # Errors
    ///
    /// Never fails for the in-memory source.
    pub fn read_until(&self, delimiter: u8, buf: &mut Vec<u8>) -> std::io::Result<usize> {
        self.0.borrow_mut().read_until(delimiter, buf)
    }
}

impl Read for SharedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

/// Shared, buffered writer into a response [`Body`].
///
/// Bytes reach the body when the buffer fills up or on [`Write::flush`]. Every
/// clone writes through the same buffer.
#[derive(Debug, Clone)]
pub struct SharedWriter(Rc<RefCell<BufWriter<Body>>>);

impl SharedWriter {
    #[must_use]
    pub fn new(body: Body, capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(BufWriter::with_capacity(capacity, body))))
    }

    /// Number of bytes written but not yet flushed into the body.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.0.borrow().buffer().len()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.borrow_mut().flush()
    }
}
