//! Orchestrator types
//!
//! Session state, status snapshots and event payloads.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::camera::{CameraInfo, CaptureStrategy};
use crate::disk::DiskUsage;
use crate::storage::Photo;

/// Booth session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothState {
    /// Ready for a trigger
    Idle,
    /// Visible countdown running
    Countdown,
    /// Countdown reached zero, waiting for the camera
    Capturing,
    /// Generating preview and thumbnail
    Processing,
    /// Showing the new photo
    Preview,
    /// Capture failed; recovers on its own
    Error,
}

impl BoothState {
    /// Whether a new trigger may start a session from this state
    #[must_use]
    pub fn accepts_trigger(&self) -> bool {
        matches!(self, Self::Idle | Self::Preview)
    }

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Countdown => "countdown",
            Self::Capturing => "capturing",
            Self::Processing => "processing",
            Self::Preview => "preview",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for BoothState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single live booth session
#[derive(Debug)]
pub(crate) struct BoothSession {
    pub(crate) state: BoothState,
    pub(crate) sequence: u64,
    pub(crate) countdown_remaining: u32,
    pub(crate) countdown_total: u32,
    pub(crate) last_photo: Option<Photo>,
    pub(crate) start_time: Instant,
}

impl BoothSession {
    pub(crate) fn new() -> Self {
        Self {
            state: BoothState::Idle,
            sequence: 0,
            countdown_remaining: 0,
            countdown_total: 0,
            last_photo: None,
            start_time: Instant::now(),
        }
    }
}

/// `status` event payload
#[derive(Debug, Clone, Serialize)]
pub struct StatusPayload {
    /// New state
    pub state: BoothState,
}

/// `countdown` event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownPayload {
    /// Seconds left on the visible timer
    pub remaining: u32,
    /// Configured countdown length
    pub total: u32,
}

/// `error` event payload
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Human-readable message
    pub message: String,
}

/// `system` event payload
#[derive(Debug, Clone, Serialize)]
pub struct SystemPayload {
    /// Last known camera information
    pub camera: CameraInfo,
    /// Photo volume usage, when it could be read
    pub disk: Option<DiskUsage>,
}

/// Point-in-time booth status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Current state
    pub state: BoothState,
    /// Connected clients (advisory)
    pub clients: usize,
    /// Process uptime, `MM:SS` or `HH:MM:SS`
    pub uptime: String,
    /// Last known camera information
    pub camera: CameraInfo,
    /// Photo volume usage
    pub disk: Option<DiskUsage>,
    /// Most recent photo
    pub last_photo: Option<Photo>,
    /// Countdown progress
    pub countdown: CountdownPayload,
    /// Active album id
    pub current_album: String,
}

/// Album summary returned by album listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumInfo {
    /// Sanitized directory name
    pub id: String,
    /// Human-friendly name
    pub display_name: String,
    /// Number of JPEG originals
    pub photo_count: usize,
    /// Bytes across original, preview and thumb
    pub size_bytes: u64,
    /// Capture strategy for this album
    pub capture_method: CaptureStrategy,
    /// Whether this is the active album
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_trigger() {
        assert!(BoothState::Idle.accepts_trigger());
        assert!(BoothState::Preview.accepts_trigger());
        for state in [
            BoothState::Countdown,
            BoothState::Capturing,
            BoothState::Processing,
            BoothState::Error,
        ] {
            assert!(!state.accepts_trigger(), "{state} must reject triggers");
        }
    }

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_string(&BoothState::Capturing).unwrap(),
            "\"capturing\""
        );
        assert_eq!(BoothState::Preview.to_string(), "preview");
    }
}
