//! In-memory HTTP response recording with connection hijacking.
//!
//! This crate provides:
//! - **`ResponseRecorder`**: captures headers, status, body bytes and flush state
//! - **`HijackableResponseRecorder`**: the same recorder, plus a `hijack()` that hands
//!   out a mock connection and a buffered reader/writer pair, the way an HTTP server
//!   does for protocol upgrades (WebSocket and friends)
//! - **`MockConn`**: memory-backed stand-in for the raw socket behind a hijack
//!
//! Bytes written after hijacking land in the same body buffer as ordinary response
//! writes, so one `body()` call shows everything the handler sent.
//!
//! # Examples
//!
//! ```rust
//! use std::io::{Read, Write};
//! use foundation_httptest::{Conn, Hijacker, HijackableResponseRecorder, ResponseWriter};
//!
//! let mut recorder = HijackableResponseRecorder::new(b"ping".to_vec());
//! recorder.write_header(101);
//!
//! let (mut conn, mut stream) = recorder.hijack().expect("mock hijack never fails");
//!
//! let mut received = [0u8; 4];
//! stream.read_exact(&mut received).unwrap();
//! assert_eq!(&received, b"ping");
//!
//! stream.write_all(b"pong").unwrap();
//! stream.flush().unwrap();
//! conn.close().unwrap();
//!
//! assert_eq!(recorder.body(), "pong");
//! assert!(recorder.closed());
//! ```
//!
//! # Features
//!
//! - `standard` (default): info and warning logging through `tracing`
//! - `debug_trace`: adds debug logging

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod macros;

pub mod body;
pub mod config;
pub mod errors;
pub mod headers;
pub mod hijack;
pub mod mockconn;
pub mod recorder;
pub mod sniff;
pub mod status;
pub mod traits;

pub use body::Body;
pub use config::RecorderConfig;
pub use errors::{HijackError, HijackResult};
pub use headers::{canonical_header_key, Headers};
pub use hijack::{HijackableResponseRecorder, HijackedReadWriter};
pub use mockconn::{MockConn, SharedReader, SharedWriter};
pub use recorder::{RecordedResponse, ResponseRecorder};
pub use sniff::detect_content_type;
pub use status::{is_valid_code, status_text};
pub use traits::{Conn, Hijacker, ResponseWriter};
