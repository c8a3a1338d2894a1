//! Booth settings: timing values, album selection and per-album strategies.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::camera::CaptureStrategy;

/// Name of the album that always exists
pub const DEFAULT_ALBUM: &str = "default";

/// Countdown used when the configured value is below one second
pub const FALLBACK_COUNTDOWN_SECS: u32 = 3;
/// Preview duration used when the configured value is below one second
pub const FALLBACK_PREVIEW_SECS: u32 = 5;

/// Accepted countdown range (seconds)
pub const COUNTDOWN_RANGE: (i64, i64) = (1, 10);
/// Accepted preview display range (seconds)
pub const PREVIEW_RANGE: (i64, i64) = (1, 30);
/// Accepted trigger delay range (milliseconds)
pub const TRIGGER_DELAY_RANGE: (i64, i64) = (-3000, 1000);

/// Runtime booth settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoothSettings {
    /// Visible countdown length in seconds
    pub countdown_seconds: u32,
    /// How long a preview stays on screen
    pub preview_display_seconds: u32,
    /// Shutter offset relative to the visible "0"; negative fires early
    pub trigger_delay_ms: i32,
    /// Directory holding one sub-directory per album
    pub photos_base_path: PathBuf,
    /// Sanitized id of the active album
    pub current_album: String,
    /// Sanitized id → display name
    pub album_display_names: BTreeMap<String, String>,
    /// Sanitized id → capture strategy
    pub album_capture_methods: BTreeMap<String, CaptureStrategy>,
}

impl Default for BoothSettings {
    fn default() -> Self {
        let mut settings = Self {
            countdown_seconds: FALLBACK_COUNTDOWN_SECS,
            preview_display_seconds: FALLBACK_PREVIEW_SECS,
            trigger_delay_ms: 0,
            photos_base_path: PathBuf::from("data/photos"),
            current_album: DEFAULT_ALBUM.to_string(),
            album_display_names: BTreeMap::new(),
            album_capture_methods: BTreeMap::new(),
        };
        settings.normalize();
        settings
    }
}

impl BoothSettings {
    /// Countdown length with the fallback applied
    #[must_use]
    pub fn effective_countdown_seconds(&self) -> u32 {
        if self.countdown_seconds < 1 {
            FALLBACK_COUNTDOWN_SECS
        } else {
            self.countdown_seconds
        }
    }

    /// Preview duration with the fallback applied
    #[must_use]
    pub fn effective_preview_seconds(&self) -> u32 {
        if self.preview_display_seconds < 1 {
            FALLBACK_PREVIEW_SECS
        } else {
            self.preview_display_seconds
        }
    }

    /// Capture strategy configured for `album`
    #[must_use]
    pub fn strategy_for(&self, album: &str) -> CaptureStrategy {
        self.album_capture_methods
            .get(album)
            .copied()
            .unwrap_or_default()
    }

    /// Capture strategy of the active album
    #[must_use]
    pub fn active_strategy(&self) -> CaptureStrategy {
        self.strategy_for(&self.current_album)
    }

    /// Display name of `album`, falling back to its id
    #[must_use]
    pub fn display_name(&self, album: &str) -> String {
        self.album_display_names
            .get(album)
            .cloned()
            .unwrap_or_else(|| album.to_string())
    }

    /// Clamp values into their ranges and restore required map entries.
    ///
    /// Returns a description of every value that had to change.
    pub fn normalize(&mut self) -> Vec<String> {
        let mut adjusted = Vec::new();

        let countdown = clamp_countdown(i64::from(self.countdown_seconds));
        if countdown != self.countdown_seconds {
            adjusted.push(format!(
                "countdown_seconds {} -> {}",
                self.countdown_seconds, countdown
            ));
            self.countdown_seconds = countdown;
        }

        let preview = clamp_preview(i64::from(self.preview_display_seconds));
        if preview != self.preview_display_seconds {
            adjusted.push(format!(
                "preview_display_seconds {} -> {}",
                self.preview_display_seconds, preview
            ));
            self.preview_display_seconds = preview;
        }

        let delay = clamp_trigger_delay(i64::from(self.trigger_delay_ms));
        if delay != self.trigger_delay_ms {
            adjusted.push(format!("trigger_delay_ms {} -> {}", self.trigger_delay_ms, delay));
            self.trigger_delay_ms = delay;
        }

        let album = sanitize_album_name(&self.current_album);
        if album != self.current_album {
            adjusted.push(format!("current_album '{}' -> '{}'", self.current_album, album));
            self.current_album = album;
        }

        self.album_display_names
            .entry(DEFAULT_ALBUM.to_string())
            .or_insert_with(|| "Default".to_string());
        self.album_capture_methods
            .entry(DEFAULT_ALBUM.to_string())
            .or_insert(CaptureStrategy::C);

        adjusted
    }
}

/// Partial settings update as submitted by a control client
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New countdown length (clamped to 1..=10)
    pub countdown_seconds: Option<i64>,
    /// New preview duration (clamped to 1..=30)
    pub preview_display_seconds: Option<i64>,
    /// New trigger delay (clamped to -3000..=1000)
    pub trigger_delay_ms: Option<i64>,
    /// Album to activate (display name or id)
    pub current_album: Option<String>,
    /// Strategy for the album being updated ("A".."D")
    pub capture_strategy: Option<String>,
}

/// Clamp a countdown length to 1..=10 seconds
#[must_use]
pub fn clamp_countdown(value: i64) -> u32 {
    value.clamp(COUNTDOWN_RANGE.0, COUNTDOWN_RANGE.1) as u32
}

/// Clamp a preview duration to 1..=30 seconds
#[must_use]
pub fn clamp_preview(value: i64) -> u32 {
    value.clamp(PREVIEW_RANGE.0, PREVIEW_RANGE.1) as u32
}

/// Clamp a trigger delay to -3000..=1000 milliseconds
#[must_use]
pub fn clamp_trigger_delay(value: i64) -> i32 {
    value.clamp(TRIGGER_DELAY_RANGE.0, TRIGGER_DELAY_RANGE.1) as i32
}

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9\-]+").expect("valid album regex"))
}

fn repeated_underscores() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_+").expect("valid underscore regex"))
}

/// Convert a human-friendly album name into a file-system-safe id.
///
/// `"Hoch Zeit!"` becomes `"hoch_zeit"`; an empty result becomes `"default"`.
#[must_use]
pub fn sanitize_album_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let replaced = invalid_chars().replace_all(&lowered, "_");
    let trimmed = replaced.trim_matches('_');
    let collapsed = repeated_underscores().replace_all(trimmed, "_");
    if collapsed.is_empty() {
        DEFAULT_ALBUM.to_string()
    } else {
        collapsed.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_album_name() {
        assert_eq!(sanitize_album_name("Hoch Zeit!"), "hoch_zeit");
        assert_eq!(sanitize_album_name("test  event"), "test_event");
        assert_eq!(sanitize_album_name("  Sommer-Fest 2024 "), "sommer-fest_2024");
        assert_eq!(sanitize_album_name("__a__b__"), "a_b");
        assert_eq!(sanitize_album_name("!!!"), "default");
        assert_eq!(sanitize_album_name(""), "default");
        assert_eq!(sanitize_album_name("../etc"), "etc");
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_countdown(0), 1);
        assert_eq!(clamp_countdown(42), 10);
        assert_eq!(clamp_preview(-1), 1);
        assert_eq!(clamp_preview(31), 30);
        assert_eq!(clamp_trigger_delay(-5000), -3000);
        assert_eq!(clamp_trigger_delay(1500), 1000);
        assert_eq!(clamp_trigger_delay(-1000), -1000);
    }

    #[test]
    fn test_fallbacks() {
        let settings = BoothSettings {
            countdown_seconds: 0,
            preview_display_seconds: 0,
            ..BoothSettings::default()
        };
        assert_eq!(settings.effective_countdown_seconds(), 3);
        assert_eq!(settings.effective_preview_seconds(), 5);
    }

    #[test]
    fn test_normalize_reports_adjustments() {
        let mut settings = BoothSettings {
            countdown_seconds: 20,
            trigger_delay_ms: -9000,
            current_album: "Party Time".to_string(),
            album_display_names: BTreeMap::new(),
            album_capture_methods: BTreeMap::new(),
            ..BoothSettings::default()
        };

        let adjusted = settings.normalize();

        assert_eq!(adjusted.len(), 3);
        assert_eq!(settings.countdown_seconds, 10);
        assert_eq!(settings.trigger_delay_ms, -3000);
        assert_eq!(settings.current_album, "party_time");
        assert_eq!(settings.display_name("default"), "Default");
        assert_eq!(settings.strategy_for("default"), CaptureStrategy::C);
    }

    #[test]
    fn test_strategy_lookup_defaults_to_c() {
        let mut settings = BoothSettings::default();
        settings
            .album_capture_methods
            .insert("wedding".to_string(), CaptureStrategy::B);
        assert_eq!(settings.strategy_for("wedding"), CaptureStrategy::B);
        assert_eq!(settings.strategy_for("unknown"), CaptureStrategy::C);
    }

    #[test]
    fn test_update_deserializes_camel_case() {
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"countdownSeconds":5,"captureStrategy":"b"}"#).unwrap();
        assert_eq!(update.countdown_seconds, Some(5));
        assert_eq!(update.capture_strategy.as_deref(), Some("b"));
        assert!(update.trigger_delay_ms.is_none());
    }
}
