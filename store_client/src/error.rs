use std::{error::Error, fmt, io};

/// The store client's result type.
pub type Result<T> = std::result::Result<T, StoreErr>;

/// Artifact transfer failures.
///
/// Transfers are never retried internally; every variant propagates to the
/// caller, who restarts the whole operation if desired.
#[derive(Debug)]
pub enum StoreErr {
    Io(io::Error),
    Rejected(String),
    UnexpectedMessage {
        got: &'static str,
    },
    /// The digest recomputed over a completed transfer does not match the
    /// checksum recorded in the metadata frame.
    ChecksumMismatch {
        expected: String,
        got: String,
    },
}

impl fmt::Display for StoreErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErr::Io(e) => write!(f, "io error: {e}"),
            StoreErr::Rejected(detail) => write!(f, "store rejected the request: {detail}"),
            StoreErr::UnexpectedMessage { got } => {
                write!(f, "unexpected message from store: got {got}")
            }
            StoreErr::ChecksumMismatch { expected, got } => {
                write!(f, "checksum mismatch: expected {expected}, got {got}")
            }
        }
    }
}

impl Error for StoreErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<StoreErr> for io::Error {
    fn from(value: StoreErr) -> Self {
        match value {
            StoreErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
