//! Photobooth Core - Capture Orchestration Engine
//!
//! This crate provides the capture state machine and the real-time event
//! distribution for the photobooth, including:
//! - Orchestrator: countdown, shutter timing, processing and preview
//! - EventHub: fan-out of booth events to connected clients
//! - Activity log: bounded ring of recent activity
//! - Settings: booth timings, albums and capture strategies
//! - Storage: photo listing and disk usage
//!
//! The camera driver and the image pipeline are reached through the
//! [`Camera`] and [`ImageProcessor`] traits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod activity_log;
pub mod camera;
pub mod disk;
pub mod error;
pub mod event;
pub mod event_hub;
pub mod imaging;
pub mod orchestrator;
pub mod settings;
pub mod storage;

pub use activity_log::{ActivityLog, LogEntry, LogLevel, LogSink, DEFAULT_LOG_CAPACITY};
pub use camera::{Camera, CameraInfo, CaptureStrategy};
pub use disk::DiskUsage;
pub use error::{Error, Result};
pub use event::{now_millis, ClientMessage, Event, EventType};
pub use event_hub::{ClientId, ClientSubscription, EventHub, TriggerHandler, DEFAULT_QUEUE_CAPACITY};
pub use imaging::{ImageProcessor, PreviewReady};
pub use orchestrator::{
    format_uptime, trigger_offset, AlbumInfo, BoothState, CountdownPayload, ErrorPayload,
    Orchestrator, OrchestratorConfig, StatusPayload, StatusSnapshot, SystemPayload,
};
pub use settings::{sanitize_album_name, BoothSettings, SettingsUpdate, DEFAULT_ALBUM};
pub use storage::{Photo, PhotoStore};
