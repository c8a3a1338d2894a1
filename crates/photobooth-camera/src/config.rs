//! Camera driver configuration

use std::time::Duration;

/// Default bounded wait for a tethered capture
pub const DEFAULT_TETHERED_TIMEOUT: Duration = Duration::from_secs(15);

/// Default limit for any other gphoto2 invocation
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Default simulated shutter latency in mock mode
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_secs(1);

/// Configuration for [`GphotoCamera`](crate::GphotoCamera)
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Simulate captures instead of driving hardware
    pub mock: bool,
    /// gphoto2 executable
    pub binary: String,
    /// Bounded wait for strategy D
    pub tethered_timeout: Duration,
    /// Limit for every other command
    pub command_timeout: Duration,
    /// Simulated capture latency in mock mode
    pub mock_delay: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mock: false,
            binary: "gphoto2".to_string(),
            tethered_timeout: DEFAULT_TETHERED_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            mock_delay: DEFAULT_MOCK_DELAY,
        }
    }
}

impl CameraConfig {
    /// Configuration for mock mode
    #[must_use]
    pub fn mock() -> Self {
        Self {
            mock: true,
            ..Self::default()
        }
    }

    /// Set the gphoto2 executable
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the tethered capture timeout
    #[must_use]
    pub fn with_tethered_timeout(mut self, timeout: Duration) -> Self {
        self.tethered_timeout = timeout;
        self
    }

    /// Set the simulated capture latency
    #[must_use]
    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }
}
