use std::{error::Error, fmt, io};

/// The agent module's result type.
pub type Result<T> = std::result::Result<T, AgentErr>;

/// Agent runtime failures.
#[derive(Debug)]
pub enum AgentErr {
    Io(io::Error),
    Config(String),
}

impl fmt::Display for AgentErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentErr::Io(e) => write!(f, "io error: {e}"),
            AgentErr::Config(detail) => write!(f, "configuration error: {detail}"),
        }
    }
}

impl Error for AgentErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AgentErr::Io(e) => Some(e),
            AgentErr::Config(_) => None,
        }
    }
}

impl From<io::Error> for AgentErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<AgentErr> for io::Error {
    fn from(value: AgentErr) -> Self {
        match value {
            AgentErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidInput, other),
        }
    }
}
