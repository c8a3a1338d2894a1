//! Error types for photobooth-imaging

use thiserror::Error;

/// Imaging error type
#[derive(Debug, Error)]
pub enum Error {
    /// Original could not be read or decoded
    #[error("cannot decode {path}: {message}")]
    Decode {
        /// Source file
        path: String,
        /// Decoder message
        message: String,
    },

    /// Derived image could not be written
    #[error("cannot encode {path}: {message}")]
    Encode {
        /// Destination file
        path: String,
        /// Encoder message
        message: String,
    },

    /// Path does not follow `<album>/original/<file>`
    #[error("unexpected original path: {0}")]
    Layout(String),

    /// Blocking worker panicked or was cancelled
    #[error("worker failed: {0}")]
    Worker(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for photobooth_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => Self::Io(e),
            other => Self::Imaging(other.to_string()),
        }
    }
}
