//! Camera collaborator contract.
//!
//! The orchestrator only talks to the camera through [`Camera`]; the gphoto2
//! driver lives in the `photobooth-camera` crate.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Procedure used to obtain the photo from the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaptureStrategy {
    /// Capture to the SD card, then download the JPEG from the card
    A,
    /// Full download, keep the copy on the card, fetch the RAW file afterwards
    B,
    /// Full download without keeping a copy on the card
    #[default]
    C,
    /// Tethered capture with a bounded wait
    D,
}

impl CaptureStrategy {
    /// All strategies in display order
    pub const ALL: [CaptureStrategy; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Whether the camera keeps its own copy of the shot
    #[must_use]
    pub fn retains_on_card(&self) -> bool {
        matches!(self, Self::A | Self::B)
    }

    /// Whether the RAW original is downloaded in the background after preview
    #[must_use]
    pub fn downloads_raw_async(&self) -> bool {
        matches!(self, Self::B)
    }

    /// Single-letter name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for CaptureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(Error::InvalidSetting {
                field: "captureStrategy".to_string(),
                message: "must be A, B, C or D".to_string(),
            }),
        }
    }
}

/// Information reported by the connected camera
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraInfo {
    /// Whether a camera answered
    pub connected: bool,
    /// Model name
    pub model: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Serial number
    pub serial_number: String,
    /// Mounted lens
    pub lens_name: String,
    /// Battery level as reported (e.g. "75%")
    pub battery_level: String,
    /// Card capacity as reported
    pub storage_total: String,
    /// Free card space as reported
    pub storage_free: String,
}

/// Physical camera driver
#[async_trait]
pub trait Camera: Send + Sync {
    /// Take a photo and store it under `<data_dir>/original`.
    ///
    /// Returns the file name. Captures are serialized; a call made while
    /// another capture is in flight fails with [`Error::CameraBusy`].
    async fn capture(&self) -> Result<String>;

    /// Hint that a capture is coming. Must return immediately.
    fn prepare_capture(&self);

    /// Select the strategy used by the next capture
    fn set_strategy(&self, strategy: CaptureStrategy);

    /// Point captures at a new album directory
    fn set_data_dir(&self, dir: &Path);

    /// Whether the camera's own copy of the last capture exists
    async fn verify_last_capture(&self) -> Result<bool>;

    /// Download the newest RAW file into `<album_dir>/raw`
    async fn download_latest_raw(&self, album_dir: &Path) -> Result<()>;

    /// Re-read camera information
    async fn refresh_info(&self);

    /// Last known camera information
    fn cached_info(&self) -> CameraInfo;

    /// Whether the last refresh found a camera
    fn is_connected(&self) -> bool {
        self.cached_info().connected
    }
}
