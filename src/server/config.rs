//! Server configuration types
//!
//! Every section has serde defaults so a partial TOML file or a handful of
//! `PHOTOBOOTH_*` variables is enough to start the booth.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use photobooth_camera::CameraConfig;
use photobooth_core::{BoothSettings, CaptureStrategy, DEFAULT_ALBUM, DEFAULT_LOG_CAPACITY, DEFAULT_QUEUE_CAPACITY};
use photobooth_imaging::ImagingConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub booth: BoothAppConfig,
    #[serde(default)]
    pub camera: CameraAppConfig,
    #[serde(default)]
    pub image: ImageAppConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Booth timings and albums, as written in TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoothAppConfig {
    #[serde(default = "default_countdown")]
    pub countdown_seconds: i64,
    #[serde(default = "default_preview")]
    pub preview_display_seconds: i64,
    #[serde(default)]
    pub trigger_delay_ms: i64,
    #[serde(default = "default_photos_base_path")]
    pub photos_base_path: PathBuf,
    #[serde(default = "default_album")]
    pub current_album: String,
    #[serde(default)]
    pub album_display_names: BTreeMap<String, String>,
    #[serde(default)]
    pub album_capture_methods: BTreeMap<String, CaptureStrategy>,
}

impl Default for BoothAppConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: default_countdown(),
            preview_display_seconds: default_preview(),
            trigger_delay_ms: 0,
            photos_base_path: default_photos_base_path(),
            current_album: default_album(),
            album_display_names: BTreeMap::new(),
            album_capture_methods: BTreeMap::new(),
        }
    }
}

fn default_countdown() -> i64 {
    3
}

fn default_preview() -> i64 {
    5
}

fn default_photos_base_path() -> PathBuf {
    PathBuf::from("data/photos")
}

fn default_album() -> String {
    DEFAULT_ALBUM.to_string()
}

impl BoothAppConfig {
    /// Runtime settings; out-of-range values are clamped later by
    /// [`BoothSettings::normalize`].
    pub fn to_settings(&self) -> BoothSettings {
        // saturate into the runtime types so clamping still sees the extreme
        let saturate_u32 = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
        let saturate_i32 = |v: i64| i32::try_from(v).unwrap_or(if v < 0 { i32::MIN } else { i32::MAX });

        BoothSettings {
            countdown_seconds: saturate_u32(self.countdown_seconds),
            preview_display_seconds: saturate_u32(self.preview_display_seconds),
            trigger_delay_ms: saturate_i32(self.trigger_delay_ms),
            photos_base_path: self.photos_base_path.clone(),
            current_album: self.current_album.clone(),
            album_display_names: self.album_display_names.clone(),
            album_capture_methods: self.album_capture_methods.clone(),
        }
    }

    /// Write normalized runtime settings back
    pub fn apply(&mut self, settings: &BoothSettings) {
        self.countdown_seconds = i64::from(settings.countdown_seconds);
        self.preview_display_seconds = i64::from(settings.preview_display_seconds);
        self.trigger_delay_ms = i64::from(settings.trigger_delay_ms);
        self.photos_base_path = settings.photos_base_path.clone();
        self.current_album = settings.current_album.clone();
        self.album_display_names = settings.album_display_names.clone();
        self.album_capture_methods = settings.album_capture_methods.clone();
    }
}

/// Camera driver and info refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraAppConfig {
    /// Probe the camera in the background
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub mock: bool,
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default = "default_tethered_timeout")]
    pub tethered_timeout_secs: u64,
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
    #[serde(default = "default_info_refresh")]
    pub info_refresh_secs: u64,
    #[serde(default = "default_info_refresh_disconnected")]
    pub info_refresh_disconnected_secs: u64,
}

impl Default for CameraAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mock: false,
            binary: default_binary(),
            tethered_timeout_secs: default_tethered_timeout(),
            command_timeout_secs: default_command_timeout(),
            info_refresh_secs: default_info_refresh(),
            info_refresh_disconnected_secs: default_info_refresh_disconnected(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_binary() -> String {
    "gphoto2".to_string()
}

fn default_tethered_timeout() -> u64 {
    15
}

fn default_command_timeout() -> u64 {
    30
}

fn default_info_refresh() -> u64 {
    10
}

fn default_info_refresh_disconnected() -> u64 {
    2
}

impl CameraAppConfig {
    pub fn driver_config(&self) -> CameraConfig {
        CameraConfig {
            mock: self.mock,
            binary: self.binary.clone(),
            tethered_timeout: Duration::from_secs(self.tethered_timeout_secs),
            command_timeout: Duration::from_secs(self.command_timeout_secs),
            ..CameraConfig::default()
        }
    }
}

/// Preview and thumbnail output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAppConfig {
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
    #[serde(default = "default_quality")]
    pub preview_quality: u8,
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,
    #[serde(default = "default_quality")]
    pub thumbnail_quality: u8,
}

impl Default for ImageAppConfig {
    fn default() -> Self {
        Self {
            preview_width: default_preview_width(),
            preview_quality: default_quality(),
            thumbnail_width: default_thumbnail_width(),
            thumbnail_quality: default_quality(),
        }
    }
}

fn default_preview_width() -> u32 {
    photobooth_imaging::DEFAULT_PREVIEW_WIDTH
}

fn default_thumbnail_width() -> u32 {
    photobooth_imaging::DEFAULT_THUMBNAIL_WIDTH
}

fn default_quality() -> u8 {
    photobooth_imaging::DEFAULT_QUALITY
}

impl ImageAppConfig {
    pub fn imaging_config(&self) -> ImagingConfig {
        ImagingConfig::default()
            .with_preview(self.preview_width, self.preview_quality)
            .with_thumbnail(self.thumbnail_width, self.thumbnail_quality)
    }
}

/// Event hub and websocket connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_ping_interval")]
    pub ping_interval_secs: u64,
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            ping_interval_secs: default_ping_interval(),
            write_timeout_secs: default_write_timeout(),
            log_capacity: default_log_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_ping_interval() -> u64 {
    30
}

fn default_write_timeout() -> u64 {
    10
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

/// Static frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default = "default_frontend_dir")]
    pub dir: PathBuf,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            dir: default_frontend_dir(),
        }
    }
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("public/frontend")
}
