//! Layered booth configuration: built-in TOML, optional files, then
//! `PHOTOBOOTH_*` variables.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Built-in `config/default.toml`
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Read and merge every configuration layer
pub fn load_config() -> Result<AppConfig> {
    let env_name = std::env::var("PHOTOBOOTH_ENV").unwrap_or_else(|_| "development".to_string());

    let config = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(File::with_name("config/local").required(false))
        // PHOTOBOOTH_CAMERA__MOCK=true overrides [camera] mock
        .add_source(
            Environment::with_prefix("PHOTOBOOTH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to merge configuration layers")?;

    config
        .try_deserialize()
        .context("Invalid photobooth configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_deserialize() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.booth.countdown_seconds, 3);
        assert_eq!(config.booth.preview_display_seconds, 5);
        assert_eq!(config.booth.current_album, "default");
        assert_eq!(config.camera.tethered_timeout_secs, 15);
        assert_eq!(config.hub.ping_interval_secs, 30);
    }
}
