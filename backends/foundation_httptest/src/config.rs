//! Recorder configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default buffer size of the writer handed out by a hijack.
pub const DEFAULT_WRITER_CAPACITY: usize = 4096;

pub(crate) const LOOPBACK: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);

/// Configuration for a [`crate::HijackableResponseRecorder`].
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Bytes the simulated peer sends after the hijack
    input: Vec<u8>,
    /// Address reported by the mock connection as its own
    local_addr: SocketAddr,
    /// Address reported by the mock connection as the peer
    remote_addr: SocketAddr,
    /// Buffer size of the hijacked writer
    writer_capacity: usize,
}

impl RecorderConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults:
    /// - `input`: empty
    /// - `local_addr` / `remote_addr`: `127.0.0.1:0`
    /// - `writer_capacity`: [`DEFAULT_WRITER_CAPACITY`]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: Vec::new(),
            local_addr: LOOPBACK,
            remote_addr: LOOPBACK,
            writer_capacity: DEFAULT_WRITER_CAPACITY,
        }
    }

    /// Sets the bytes available to read after hijacking.
    #[must_use]
    pub fn input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = input.into();
        self
    }

    #[must_use]
    pub const fn local_addr(mut self, addr: SocketAddr) -> Self {
        self.local_addr = addr;
        self
    }

    #[must_use]
    pub const fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = addr;
        self
    }

    /// Sets the buffer size of the hijacked writer.
    ///
    /// Bytes written through the hijacked writer only reach the body once this
    /// buffer fills up or is flushed.
    #[must_use]
    pub const fn writer_capacity(mut self, capacity: usize) -> Self {
        self.writer_capacity = capacity;
        self
    }

    #[must_use]
    pub fn get_input(&self) -> &[u8] {
        &self.input
    }

    #[must_use]
    pub const fn get_local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    #[must_use]
    pub const fn get_remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    #[must_use]
    pub const fn get_writer_capacity(&self) -> usize {
        self.writer_capacity
    }

    pub(crate) fn into_input(self) -> Vec<u8> {
        self.input
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::new()
    }
}
