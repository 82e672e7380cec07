//! Error types shared by every stream backend.

use std::io;
use std::string::FromUtf8Error;

/// Failure outcomes of stream operations.
///
/// Variants carrying an `i32` hold the OS error code reported by the failing
/// call. A code of `0` means the operation was rejected by the stream's
/// [`Capabilities`] before any OS call was made.
///
/// [`Capabilities`]: crate::Capabilities
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading failed, or the stream is not readable.
    #[error("read failed{}", os_suffix(.0))]
    ReadFailed(i32),

    /// Writing failed, or the stream is not writable.
    #[error("write failed{}", os_suffix(.0))]
    WriteFailed(i32),

    /// Seeking failed, or the stream is not seekable.
    #[error("seek failed{}", os_suffix(.0))]
    SeekFailed(i32),

    /// Releasing the underlying resource failed.
    #[error("close failed{}", os_suffix(.0))]
    CloseFailed(i32),

    /// A write accepted none of the bytes it was given.
    #[error("write made no progress")]
    WriteZero,

    /// No readiness was reported before the configured timeout elapsed.
    #[error("operation timed out")]
    TimedOut,

    /// The stream has been closed, either locally or by the other end.
    #[error("stream closed")]
    Closed,

    /// The OS open call failed.
    #[error("open failed{}", os_suffix(.0))]
    OpenFailed(i32),

    /// The requested access and mode can't be combined.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The mode requires an existing file and there is none.
    #[error("file not found")]
    FileNotFound,

    /// The mode requires a new file and one already exists.
    #[error("file exists")]
    FileExists,

    /// A NUL-terminated string read back was not valid UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// A `Result` defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

fn os_suffix(code: &i32) -> String {
    if *code == 0 {
        String::new()
    } else {
        format!(" (os error {code})")
    }
}

impl Error {
    /// Returns the OS error code carried by this error, if the failure was
    /// reported by the OS rather than by a capability check.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match *self {
            Self::ReadFailed(code)
            | Self::WriteFailed(code)
            | Self::SeekFailed(code)
            | Self::CloseFailed(code)
            | Self::OpenFailed(code) => (code != 0).then_some(code),
            _ => None,
        }
    }

    /// Returns `true` if this error is a capability violation, i.e. the
    /// stream refused the operation without asking the OS.
    #[must_use]
    pub fn is_capability_violation(&self) -> bool {
        matches!(
            *self,
            Self::ReadFailed(0) | Self::WriteFailed(0) | Self::SeekFailed(0) | Self::CloseFailed(0)
        )
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let Some(code) = err.raw_os_error() {
            return io::Error::from_raw_os_error(code);
        }
        let kind = match err {
            Error::WriteZero => io::ErrorKind::WriteZero,
            Error::TimedOut => io::ErrorKind::TimedOut,
            Error::Closed => io::ErrorKind::UnexpectedEof,
            Error::FileNotFound => io::ErrorKind::NotFound,
            Error::FileExists => io::ErrorKind::AlreadyExists,
            Error::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            Error::InvalidUtf8(_) => io::ErrorKind::InvalidData,
            _ => io::ErrorKind::Unsupported,
        };
        io::Error::new(kind, err)
    }
}
