//! Errors of the frame codec.

use std::fmt::{Display, Formatter};

use crate::protocol::MAX_PAYLOAD_SIZE;

/// Errors that can occur when constructing or using an [`EasyTransfer`](crate::EasyTransfer).
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The payload size is zero or does not fit the length byte.
    InvalidPayloadSize(usize),
    /// The caller's payload buffer does not match the configured payload size.
    PayloadSizeMismatch {
        /// The configured payload size.
        expected: usize,
        /// The size of the buffer passed in.
        found: usize,
    },
    /// The transport failed.
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPayloadSize(size) => {
                write!(f, "Invalid payload size: {size} not in 1..={MAX_PAYLOAD_SIZE}")
            }
            Self::PayloadSizeMismatch { expected, found } => write!(
                f,
                "Payload size mismatch. Expected {expected} bytes, but found {found} bytes."
            ),
            Self::Io(error) => write!(f, "I/O error: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
