use derive_more::From;

pub type HijackResult<T> = std::result::Result<T, HijackError>;

/// Failures a [`crate::Hijacker`] may report.
///
/// [`crate::HijackableResponseRecorder`] never returns one: its connection is
/// memory-backed and always available.
#[derive(From, Debug)]
pub enum HijackError {
    /// The writer cannot hand out its underlying connection.
    #[from(ignore)]
    NotSupported,

    /// The connection was already closed before the hijack.
    #[from(ignore)]
    AlreadyClosed,

    Io(std::io::Error),
}

impl std::error::Error for HijackError {}

impl core::fmt::Display for HijackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
