//! Configuration validation
//!
//! Clamps booth values into range and resolves the photo directory.

use super::config::AppConfig;
use anyhow::{Context, Result};
use tracing::warn;

/// Normalize `config` in place, logging every adjusted value
pub fn validate_config(config: &mut AppConfig) -> Result<()> {
    let mut settings = config.booth.to_settings();
    for adjustment in settings.normalize() {
        warn!("Config value out of range, adjusted: {}", adjustment);
    }

    if settings.photos_base_path.is_relative() {
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        settings.photos_base_path = cwd.join(&settings.photos_base_path);
    }
    config.booth.apply(&settings);

    if config.hub.queue_capacity == 0 {
        warn!("hub.queue_capacity must be positive, using 1");
        config.hub.queue_capacity = 1;
    }
    if config.hub.ping_interval_secs == 0 {
        warn!("hub.ping_interval_secs must be positive, using 30");
        config.hub.ping_interval_secs = 30;
    }
    if config.hub.write_timeout_secs == 0 {
        warn!("hub.write_timeout_secs must be positive, using 10");
        config.hub.write_timeout_secs = 10;
    }
    if config.camera.mock {
        warn!("Camera mock mode enabled, no hardware will be used");
    }
    Ok(())
}
