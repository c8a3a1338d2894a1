//! Orchestrator - booth session state machine
//!
//! Drives countdown, shutter timing, processing and preview, and publishes
//! every transition through the [`EventHub`](crate::event_hub::EventHub).
//!
//! # Module Structure
//!
//! - `types`: session state, payloads and snapshots
//! - `config`: fixed sequence timings
//! - `timing`: trigger offset and uptime helpers
//! - `core`: `Orchestrator` struct, trigger entry point and queries
//! - `sequence`: the capture sequence itself
//! - `albums`: album/gallery operations and settings updates

mod albums;
mod config;
mod core;
mod sequence;
mod timing;
mod types;


pub use config::{OrchestratorConfig, DEFAULT_BACKUP_VERIFY_DELAY, DEFAULT_ERROR_RECOVERY};
pub use core::Orchestrator;
pub use timing::{format_uptime, trigger_offset};
pub use types::{
    AlbumInfo, BoothState, CountdownPayload, ErrorPayload, StatusPayload, StatusSnapshot,
    SystemPayload,
};
