//! Error types for photobooth-core
//!
//! Only capture failures ever reach the session state. Everything else is
//! reported to the caller of the failing operation and logged.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Camera is already capturing
    #[error("camera is busy")]
    CameraBusy,

    /// Camera capture or camera-side operation failed
    #[error("capture failed: {0}")]
    Capture(String),

    /// Bounded wait for a capture elapsed
    #[error("capture timed out after {0} seconds")]
    CaptureTimeout(u64),

    /// Preview/thumbnail generation failed
    #[error("imaging error: {0}")]
    Imaging(String),

    /// Album operation rejected by a rule (default album, active album, ...)
    #[error("album error: {0}")]
    Album(String),

    /// Invalid settings value
    #[error("invalid setting {field}: {message}")]
    InvalidSetting {
        /// Setting name
        field: String,
        /// Detailed message
        message: String,
    },

    /// File system error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (task join, serialization, ...)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the request rather than the system
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Album(_) | Error::InvalidSetting { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::CameraBusy.to_string(), "camera is busy");
        assert_eq!(
            Error::CaptureTimeout(15).to_string(),
            "capture timed out after 15 seconds"
        );
        let err = Error::InvalidSetting {
            field: "captureStrategy".to_string(),
            message: "must be A, B, C or D".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid setting captureStrategy: must be A, B, C or D"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::Album("cannot delete default album".into()).is_client_error());
        assert!(!Error::Capture("usb".into()).is_client_error());
        assert!(!Error::Io(std::io::Error::other("disk")).is_client_error());
    }
}
