//! Handler-level tests driving the recorders through their traits.
//!
//! The handlers here are written the way production code is: against
//! `ResponseWriter` and `Hijacker`, with no knowledge of the recorder behind them.

use std::io::{Read, Write};

use foundation_httptest::{
    Body, Conn, Headers, HijackError, HijackResult, Hijacker, HijackableResponseRecorder,
    HijackedReadWriter, MockConn, RecorderConfig, ResponseRecorder, ResponseWriter, SharedReader,
};

const SWITCHING: &[u8] = b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: echo\r\nConnection: Upgrade\r\n\r\n";

fn hello_handler<W: ResponseWriter>(w: &mut W) -> std::io::Result<()> {
    w.headers_mut().set("X-Handler", "hello");
    w.write_string("hello")?;
    w.flush()
}

// Takes the connection over, echoes whatever the peer sent, then hangs up.
fn echo_upgrade_handler<W>(w: &mut W) -> std::io::Result<()>
where
    W: ResponseWriter + Hijacker,
{
    let (mut conn, mut stream) = w.hijack().map_err(std::io::Error::other)?;
    stream.write_all(SWITCHING)?;

    let mut buf = [0u8; 3];
    loop {
        let read = stream.read(&mut buf)?;
        if read == 0 {
            break;
        }
        stream.write_all(&buf[..read])?;
    }

    stream.flush()?;
    conn.close()
}

// Upgrades when it can, otherwise answers 426 over plain HTTP.
fn upgrade_or_refuse<W>(w: &mut W) -> std::io::Result<bool>
where
    W: ResponseWriter + Hijacker,
{
    match w.hijack() {
        Ok((mut conn, mut stream)) => {
            stream.write_all(SWITCHING)?;
            stream.flush()?;
            conn.close()?;
            Ok(true)
        }
        Err(HijackError::NotSupported | HijackError::AlreadyClosed) => {
            w.write_header(426);
            w.write_string("upgrade unavailable")?;
            Ok(false)
        }
        Err(HijackError::Io(err)) => Err(err),
    }
}

// Stands in for a transport whose connection cannot be taken over, like HTTP/2.
struct NoHijackWriter(ResponseRecorder);

impl Write for NoHijackWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

impl ResponseWriter for NoHijackWriter {
    fn headers(&self) -> &Headers {
        self.0.headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.0.headers_mut()
    }

    fn write_header(&mut self, code: u16) {
        self.0.write_header(code);
    }
}

impl Hijacker for NoHijackWriter {
    type Conn = MockConn<Body, SharedReader>;
    type ReadWriter = HijackedReadWriter;

    fn hijack(&mut self) -> HijackResult<(Self::Conn, Self::ReadWriter)> {
        Err(HijackError::NotSupported)
    }
}

// Refuses to hand the connection out again once it has been closed.
struct SingleUpgradeWriter(HijackableResponseRecorder);

impl Write for SingleUpgradeWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

impl ResponseWriter for SingleUpgradeWriter {
    fn headers(&self) -> &Headers {
        self.0.headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.0.headers_mut()
    }

    fn write_header(&mut self, code: u16) {
        self.0.write_header(code);
    }
}

impl Hijacker for SingleUpgradeWriter {
    type Conn = MockConn<Body, SharedReader>;
    type ReadWriter = HijackedReadWriter;

    fn hijack(&mut self) -> HijackResult<(Self::Conn, Self::ReadWriter)> {
        if self.0.closed() {
            return Err(HijackError::AlreadyClosed);
        }
        self.0.hijack()
    }
}

#[test]
fn handler_falls_back_when_hijacking_is_not_supported() {
    let mut writer = NoHijackWriter(ResponseRecorder::new());

    assert!(matches!(writer.hijack(), Err(HijackError::NotSupported)));
    assert!(!upgrade_or_refuse(&mut writer).unwrap());

    let result = writer.0.result();
    assert_eq!(result.status_line, "426 Upgrade Required");
    assert_eq!(result.body_string(), "upgrade unavailable");
}

#[test]
fn handler_falls_back_when_connection_already_closed() {
    let mut writer = SingleUpgradeWriter(HijackableResponseRecorder::default());

    assert!(upgrade_or_refuse(&mut writer).unwrap());
    assert!(writer.0.closed());

    let err = writer.hijack().unwrap_err();
    assert!(matches!(err, HijackError::AlreadyClosed));
    assert_eq!(err.to_string(), "AlreadyClosed");

    assert!(!upgrade_or_refuse(&mut writer).unwrap());
    assert_eq!(writer.0.code(), Some(426));

    let mut expected = SWITCHING.to_vec();
    expected.extend_from_slice(b"upgrade unavailable");
    assert_eq!(writer.0.body().to_vec(), expected);
}

#[test]
fn plain_handler_behaves_the_same_on_both_recorders() {
    let mut plain = ResponseRecorder::new();
    let mut hijackable = HijackableResponseRecorder::default();

    hello_handler(&mut plain).unwrap();
    hello_handler(&mut hijackable).unwrap();

    assert_eq!(plain.result(), hijackable.result());
    assert_eq!(hijackable.body(), "hello");
    assert!(hijackable.flushed());
    assert!(!hijackable.closed());
    assert_eq!(
        hijackable.result().headers.get("Content-Type"),
        Some("text/plain; charset=utf-8")
    );
}

#[test]
fn echo_upgrade_records_handshake_and_echo() {
    let mut recorder = HijackableResponseRecorder::new("ping pong");

    echo_upgrade_handler(&mut recorder).unwrap();

    let mut expected = SWITCHING.to_vec();
    expected.extend_from_slice(b"ping pong");
    assert_eq!(recorder.body().to_vec(), expected);
    assert!(recorder.closed());
    assert!(recorder.hijacked());
}

#[test]
fn echo_upgrade_with_no_input_only_writes_handshake() {
    let mut recorder = HijackableResponseRecorder::default();

    echo_upgrade_handler(&mut recorder).unwrap();

    assert_eq!(recorder.body().to_vec(), SWITCHING);
    assert!(recorder.closed());
}

#[test]
fn body_is_pre_hijack_writes_followed_by_post_hijack_writes() {
    let cases: &[(&[&str], &[&str])] = &[
        (&[], &[]),
        (&["a"], &[]),
        (&[], &["b"]),
        (&["GET ", "done"], &["frame", "", "end"]),
    ];

    for (before, after) in cases {
        let mut recorder = HijackableResponseRecorder::default();
        for chunk in *before {
            recorder.write_string(chunk).unwrap();
        }

        let (_conn, mut stream) = recorder.hijack().unwrap();
        for chunk in *after {
            stream.write_all(chunk.as_bytes()).unwrap();
        }
        stream.flush().unwrap();

        let expected: String = before.iter().chain(after.iter()).copied().collect();
        assert_eq!(recorder.body(), expected.as_str());
    }
}

#[test]
fn hijacked_reads_follow_seeded_input_in_order() {
    let input = b"\x81\x05hello\x88\x00".to_vec();
    let mut recorder = HijackableResponseRecorder::new(input.clone());
    recorder.write_string("ignored by the reader").unwrap();

    let (_conn, mut stream) = recorder.hijack().unwrap();
    let mut received = Vec::new();
    let mut buf = [0u8; 2];
    loop {
        let read = stream.read(&mut buf).unwrap();
        if read == 0 {
            break;
        }
        received.extend_from_slice(&buf[..read]);
    }

    assert_eq!(received, input);
    assert_eq!(stream.read(&mut buf).unwrap(), 0);
}

#[test]
fn raw_connection_reads_and_writes_share_the_recorder_streams() {
    let mut recorder = HijackableResponseRecorder::new("hello");
    let (mut conn, mut stream) = recorder.hijack().unwrap();

    let mut first = [0u8; 2];
    conn.read_exact(&mut first).unwrap();
    let mut rest = String::new();
    stream.read_to_string(&mut rest).unwrap();
    assert_eq!(&first, b"he");
    assert_eq!(rest, "llo");

    conn.write_all(b"direct").unwrap();
    assert_eq!(recorder.body(), "direct");
}

#[test]
fn closed_flag_never_reverts() {
    let mut recorder = HijackableResponseRecorder::default();
    let (mut conn, _stream) = recorder.hijack().unwrap();
    conn.close().unwrap();

    let (mut again, _) = recorder.hijack().unwrap();
    again.write_all(b"x").unwrap();
    again.close().unwrap();

    assert!(recorder.closed());
    assert!(again.closed());
}

#[test]
fn status_reads_back_last_value_or_unset() {
    let mut recorder = HijackableResponseRecorder::default();
    assert_eq!(recorder.code(), None);
    assert_eq!(recorder.result().status, 200);

    recorder.write_header(400);
    recorder.write_header(426);
    assert_eq!(recorder.code(), Some(426));
    assert_eq!(recorder.result().status_line, "426 Upgrade Required");
}

#[test]
fn configured_connection_reports_addresses() {
    let local = "127.0.0.1:8080".parse().unwrap();
    let remote = "203.0.113.7:61000".parse().unwrap();
    let mut recorder = HijackableResponseRecorder::with_config(
        RecorderConfig::new().local_addr(local).remote_addr(remote),
    );

    let (conn, _stream) = recorder.hijack().unwrap();
    assert_eq!(conn.local_addr(), local);
    assert_eq!(conn.remote_addr(), remote);
}
