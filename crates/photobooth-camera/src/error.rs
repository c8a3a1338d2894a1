//! Error types for photobooth-camera

use thiserror::Error;

/// Camera driver error type
#[derive(Debug, Error)]
pub enum Error {
    /// Another capture is in flight
    #[error("camera is busy")]
    Busy,

    /// gphoto2 could not be started or exited with an error
    #[error("gphoto2 failed: {0}")]
    Command(String),

    /// Command did not finish in time and was killed
    #[error("gphoto2 timed out after {0} seconds")]
    Timeout(u64),

    /// Capture finished but produced no file
    #[error("file not found after capture: {0}")]
    MissingFile(String),

    /// Nothing matching on the card
    #[error("no file on card: {0}")]
    NotOnCard(String),

    /// Mock image could not be generated
    #[error("mock image error: {0}")]
    MockImage(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for photobooth_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Busy => Self::CameraBusy,
            Error::Timeout(secs) => Self::CaptureTimeout(secs),
            Error::Io(e) => Self::Io(e),
            other => Self::Capture(other.to_string()),
        }
    }
}
