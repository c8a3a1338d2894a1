//! Shared fixtures for the server tests

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use photobooth_core::{Camera, CameraInfo, CaptureStrategy};

use crate::server::config::AppConfig;

/// Mock-camera configuration rooted at `photos`
pub fn test_config(photos: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.camera.mock = true;
    config.booth.photos_base_path = photos.to_path_buf();
    config
}

/// Camera that only counts info refreshes
#[derive(Default)]
pub struct CountingCamera {
    pub refreshes: AtomicUsize,
    pub connected: AtomicBool,
}

#[async_trait]
impl Camera for CountingCamera {
    async fn capture(&self) -> photobooth_core::Result<String> {
        Err(photobooth_core::Error::Capture("not wired".to_string()))
    }

    fn prepare_capture(&self) {}

    fn set_strategy(&self, _strategy: CaptureStrategy) {}

    fn set_data_dir(&self, _dir: &Path) {}

    async fn verify_last_capture(&self) -> photobooth_core::Result<bool> {
        Ok(true)
    }

    async fn download_latest_raw(&self, _album_dir: &Path) -> photobooth_core::Result<()> {
        Ok(())
    }

    async fn refresh_info(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn cached_info(&self) -> CameraInfo {
        CameraInfo {
            connected: self.connected.load(Ordering::SeqCst),
            ..CameraInfo::default()
        }
    }
}
