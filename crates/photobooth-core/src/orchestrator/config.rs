//! Orchestrator configuration

use std::time::Duration;

/// Default hold time in the Error state before returning to Idle
pub const DEFAULT_ERROR_RECOVERY: Duration = Duration::from_secs(2);

/// Default delay before checking the camera's own copy of a capture
pub const DEFAULT_BACKUP_VERIFY_DELAY: Duration = Duration::from_millis(500);

/// Fixed timings of the capture sequence
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// How long the Error state is held
    pub error_recovery: Duration,
    /// Delay between preview and backup verification
    pub backup_verify_delay: Duration,
    /// Whether backup verification runs at all
    pub verify_backups: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            error_recovery: DEFAULT_ERROR_RECOVERY,
            backup_verify_delay: DEFAULT_BACKUP_VERIFY_DELAY,
            verify_backups: true,
        }
    }
}

impl OrchestratorConfig {
    /// Create a config with default timings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Error hold time
    #[must_use]
    pub fn with_error_recovery(mut self, duration: Duration) -> Self {
        self.error_recovery = duration;
        self
    }

    /// Set the backup verification delay
    #[must_use]
    pub fn with_backup_verify_delay(mut self, duration: Duration) -> Self {
        self.backup_verify_delay = duration;
        self
    }

    /// Enable or disable backup verification
    #[must_use]
    pub fn with_backup_verification(mut self, enabled: bool) -> Self {
        self.verify_backups = enabled;
        self
    }
}
