use std::{error::Error, fmt, io};

pub type GenericError = Box<dyn Error + Send + Sync + 'static>;

pub type PingResult<T> = std::result::Result<T, PingError>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The echo request payload is larger than the codec accepts.
    PayloadTooLarge,
    /// A buffer is too short to hold an ICMP header.
    Malformed,
    /// Round-trip statistics were requested without any samples.
    InsufficientData,
    /// The target host could not be resolved to an IPv4 address.
    Resolve,
    /// Opening the ICMP socket requires privileges the process lacks.
    PermissionDenied,
    Io,
}

#[derive(Debug)]
pub struct PingError {
    pub kind: ErrorKind,
    pub message: String,
    // no chained error
}

impl PingError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        PingError {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "PingError")?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl Error for PingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<io::Error> for PingError {
    fn from(error: io::Error) -> PingError {
        let kind = match error.kind() {
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::Io,
        };
        PingError {
            kind,
            message: error.to_string(),
        }
    }
}

impl From<ctrlc::Error> for PingError {
    fn from(error: ctrlc::Error) -> PingError {
        PingError {
            kind: ErrorKind::Io,
            message: format!("could not install interrupt handler: {error}"),
        }
    }
}
