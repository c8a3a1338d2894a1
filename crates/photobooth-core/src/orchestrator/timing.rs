//! Countdown and trigger timing helpers

use std::time::Duration;

/// Delay from countdown start at which the shutter fires.
///
/// `max(0, seconds * 1000 + delay_ms)` milliseconds.
#[must_use]
pub fn trigger_offset(countdown_secs: u32, delay_ms: i32) -> Duration {
    let offset = i64::from(countdown_secs) * 1000 + i64::from(delay_ms);
    Duration::from_millis(offset.max(0) as u64)
}

/// Format an uptime as `MM:SS`, or `HH:MM:SS` once it reaches an hour
#[must_use]
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
