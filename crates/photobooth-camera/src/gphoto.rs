//! gphoto2 driven camera

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use photobooth_core::{Camera, CameraInfo, CaptureStrategy};
use tracing::{debug, info, warn};

use crate::command;
use crate::config::CameraConfig;
use crate::error::{Error, Result};
use crate::mock::{mock_info, write_mock_jpeg};
use crate::parse::{parse_file_list, parse_storage, parse_summary, CardFile};

/// Allowed skew between host and camera clocks when matching card files
const CARD_CLOCK_SKEW_SECS: i64 = 120;

/// Limit for summary and storage queries
const INFO_TIMEOUT_SECS: u64 = 10;

/// Clears the busy flag when the capture ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Camera backed by the `gphoto2` command line tool
pub struct GphotoCamera {
    config: CameraConfig,
    data_dir: RwLock<PathBuf>,
    strategy: RwLock<CaptureStrategy>,
    busy: AtomicBool,
    info: RwLock<CameraInfo>,
    last_capture: RwLock<Option<DateTime<Utc>>>,
    shots: AtomicU32,
}

impl GphotoCamera {
    /// Create a driver writing into `<data_dir>/original`
    #[must_use]
    pub fn new(config: CameraConfig, data_dir: impl Into<PathBuf>) -> Self {
        let info = if config.mock {
            mock_info()
        } else {
            CameraInfo::default()
        };
        Self {
            config,
            data_dir: RwLock::new(data_dir.into()),
            strategy: RwLock::new(CaptureStrategy::default()),
            busy: AtomicBool::new(false),
            info: RwLock::new(info),
            last_capture: RwLock::new(None),
            shots: AtomicU32::new(0),
        }
    }

    /// Whether captures are simulated
    #[must_use]
    pub fn is_mock(&self) -> bool {
        self.config.mock
    }

    /// Strategy used by the next capture
    #[must_use]
    pub fn strategy(&self) -> CaptureStrategy {
        *self.strategy.read().unwrap_or_else(|e| e.into_inner())
    }

    fn original_dir(&self) -> PathBuf {
        self.data_dir
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .join("original")
    }

    /// `IMG_YYYYMMDD_HHMMSS.jpg`, suffixed when a file of that name exists
    fn next_filename(dir: &Path) -> String {
        let stem = Local::now().format("IMG_%Y%m%d_%H%M%S").to_string();
        let mut name = format!("{stem}.jpg");
        let mut n = 1;
        while dir.join(&name).exists() {
            name = format!("{stem}_{n}.jpg");
            n += 1;
        }
        name
    }

    async fn gphoto(&self, args: &[String], limit: std::time::Duration) -> Result<String> {
        command::run(&self.config.binary, args, limit).await
    }

    async fn capture_inner(&self) -> Result<String> {
        let dir = self.original_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let filename = Self::next_filename(&dir);
        let target = dir.join(&filename);
        let strategy = self.strategy();

        *self.last_capture.write().unwrap_or_else(|e| e.into_inner()) = Some(Utc::now());

        if self.config.mock {
            return self.mock_capture(target, filename).await;
        }

        let limit = if strategy == CaptureStrategy::D {
            self.config.tethered_timeout
        } else {
            self.config.command_timeout
        };
        debug!(%strategy, target = %target.display(), "Capturing");
        self.gphoto(&capture_args(strategy, &target), limit).await?;

        if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
            return Err(Error::MissingFile(filename));
        }
        info!(%strategy, filename = %filename, "Captured");
        Ok(filename)
    }

    async fn mock_capture(&self, target: PathBuf, filename: String) -> Result<String> {
        debug!(target = %target.display(), "Mock capture");
        tokio::time::sleep(self.config.mock_delay).await;
        let seed = self.shots.fetch_add(1, Ordering::Relaxed);
        tokio::task::spawn_blocking(move || write_mock_jpeg(&target, seed))
            .await
            .map_err(|e| Error::MockImage(e.to_string()))??;
        Ok(filename)
    }

    async fn card_files(&self) -> Result<Vec<CardFile>> {
        let output = self
            .gphoto(&["--list-files".to_string()], self.config.command_timeout)
            .await?;
        Ok(parse_file_list(&output))
    }

    async fn query_info(&self) -> CameraInfo {
        let limit = std::time::Duration::from_secs(INFO_TIMEOUT_SECS);
        let mut info = CameraInfo::default();

        match self.gphoto(&["--summary".to_string()], limit).await {
            Ok(summary) => {
                info.connected = true;
                parse_summary(&summary, &mut info);
            }
            Err(e) => {
                debug!(error = %e, "Camera info unavailable");
                return info;
            }
        }

        match self.gphoto(&["--storage-info".to_string()], limit).await {
            Ok(storage) => parse_storage(&storage, &mut info),
            Err(e) => debug!(error = %e, "Storage info unavailable"),
        }
        info
    }
}

/// gphoto2 arguments for one capture
pub(crate) fn capture_args(strategy: CaptureStrategy, target: &Path) -> Vec<String> {
    let target = target.to_string_lossy().into_owned();
    let mut args = Vec::new();
    match strategy {
        // capture to card, download, keep the card copy
        CaptureStrategy::A | CaptureStrategy::B => {
            args.extend(["--set-config", "capturetarget=1", "--capture-image-and-download", "--keep"]);
        }
        // capture to camera RAM and download
        CaptureStrategy::C => {
            args.extend(["--set-config", "capturetarget=0", "--capture-image-and-download"]);
        }
        // fire and wait for the file-added event
        CaptureStrategy::D => {
            args.extend(["--trigger-capture", "--wait-event-and-download=FILEADDED"]);
        }
    }
    let mut args: Vec<String> = args.into_iter().map(str::to_string).collect();
    args.extend([
        "--force-overwrite".to_string(),
        "--filename".to_string(),
        target,
    ]);
    args
}

#[async_trait]
impl Camera for GphotoCamera {
    async fn capture(&self) -> photobooth_core::Result<String> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Busy.into());
        }
        let _guard = BusyGuard(&self.busy);
        Ok(self.capture_inner().await?)
    }

    fn prepare_capture(&self) {
        // cheap local preparation only; the USB link stays free for the shutter
        if let Err(e) = std::fs::create_dir_all(self.original_dir()) {
            warn!(error = %e, "Cannot prepare capture directory");
        }
    }

    fn set_strategy(&self, strategy: CaptureStrategy) {
        *self.strategy.write().unwrap_or_else(|e| e.into_inner()) = strategy;
    }

    fn set_data_dir(&self, dir: &Path) {
        *self.data_dir.write().unwrap_or_else(|e| e.into_inner()) = dir.to_path_buf();
    }

    async fn verify_last_capture(&self) -> photobooth_core::Result<bool> {
        if self.config.mock {
            return Ok(true);
        }
        let since = *self.last_capture.read().unwrap_or_else(|e| e.into_inner());
        let files = self.card_files().await?;
        let found = files.iter().filter(|f| f.is_jpeg()).any(|f| {
            match (f.timestamp, since) {
                (Some(ts), Some(since)) => ts >= since.timestamp() - CARD_CLOCK_SKEW_SECS,
                _ => true,
            }
        });
        Ok(found)
    }

    async fn download_latest_raw(&self, album_dir: &Path) -> photobooth_core::Result<()> {
        if self.config.mock {
            debug!("Mock mode, no RAW to download");
            return Ok(());
        }
        let files = self.card_files().await?;
        let latest = files
            .iter()
            .filter(|f| f.is_raw())
            .max_by_key(|f| f.number)
            .ok_or_else(|| Error::NotOnCard("RAW".to_string()))?;

        let raw_dir = album_dir.join("raw");
        tokio::fs::create_dir_all(&raw_dir).await.map_err(Error::from)?;
        let args = vec![
            "--get-file".to_string(),
            latest.number.to_string(),
            "--force-overwrite".to_string(),
            "--filename".to_string(),
            raw_dir.join(&latest.name).to_string_lossy().into_owned(),
        ];
        self.gphoto(&args, self.config.command_timeout).await?;
        info!(file = %latest.name, "RAW downloaded");
        Ok(())
    }

    async fn refresh_info(&self) {
        if self.config.mock {
            return;
        }
        let info = self.query_info().await;
        let was_connected = self.is_connected();
        if info.connected != was_connected {
            if info.connected {
                info!(model = %info.model, "Camera connected");
            } else {
                warn!("Camera disconnected");
            }
        }
        *self.info.write().unwrap_or_else(|e| e.into_inner()) = info;
    }

    fn cached_info(&self) -> CameraInfo {
        self.info.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn mock_camera(dir: &TempDir, delay: Duration) -> GphotoCamera {
        GphotoCamera::new(CameraConfig::mock().with_mock_delay(delay), dir.path())
    }

    #[test]
    fn test_capture_args_per_strategy() {
        let target = Path::new("/data/default/original/IMG_1.jpg");

        let a = capture_args(CaptureStrategy::A, target);
        assert!(a.contains(&"--keep".to_string()));
        assert!(a.contains(&"capturetarget=1".to_string()));

        let c = capture_args(CaptureStrategy::C, target);
        assert!(!c.contains(&"--keep".to_string()));
        assert!(c.contains(&"capturetarget=0".to_string()));

        let d = capture_args(CaptureStrategy::D, target);
        assert_eq!(d[0], "--trigger-capture");

        for args in [a, c, d] {
            assert_eq!(args.last().unwrap(), "/data/default/original/IMG_1.jpg");
            assert!(args.contains(&"--force-overwrite".to_string()));
        }
    }

    #[test]
    fn test_filename_format_and_collisions() {
        let tmp = TempDir::new().unwrap();
        let first = GphotoCamera::next_filename(tmp.path());
        assert!(first.starts_with("IMG_"));
        assert!(first.ends_with(".jpg"));
        assert_eq!(first.len(), "IMG_20240101_120000.jpg".len());

        std::fs::write(tmp.path().join(&first), b"x").unwrap();
        let second = GphotoCamera::next_filename(tmp.path());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_mock_capture_writes_jpeg() {
        let tmp = TempDir::new().unwrap();
        let camera = mock_camera(&tmp, Duration::ZERO);

        let filename = camera.capture().await.unwrap();
        let path = tmp.path().join("original").join(&filename);
        assert!(path.is_file());
        assert!(image::open(&path).is_ok());
        assert!(camera.verify_last_capture().await.unwrap());
        assert!(camera.cached_info().connected);
    }

    #[tokio::test]
    async fn test_concurrent_capture_is_busy() {
        let tmp = TempDir::new().unwrap();
        let camera = Arc::new(mock_camera(&tmp, Duration::from_millis(200)));

        let (a, b) = tokio::join!(camera.capture(), camera.capture());
        let busy = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(photobooth_core::Error::CameraBusy)))
            .count();
        assert_eq!(busy, 1);
        assert!(a.is_ok() || b.is_ok());

        // flag is released afterwards
        assert!(camera.capture().await.is_ok());
    }

    #[tokio::test]
    async fn test_set_data_dir_moves_captures() {
        let tmp = TempDir::new().unwrap();
        let camera = mock_camera(&tmp, Duration::ZERO);
        let album = tmp.path().join("party");
        camera.set_data_dir(&album);
        camera.prepare_capture();
        assert!(album.join("original").is_dir());

        let filename = camera.capture().await.unwrap();
        assert!(album.join("original").join(filename).is_file());
    }

    #[tokio::test]
    async fn test_missing_binary_reports_capture_failure() {
        let tmp = TempDir::new().unwrap();
        let camera = GphotoCamera::new(
            CameraConfig::default().with_binary("definitely-not-gphoto2"),
            tmp.path(),
        );

        let err = camera.capture().await.unwrap_err();
        assert!(matches!(err, photobooth_core::Error::Capture(_)));

        camera.refresh_info().await;
        assert!(!camera.is_connected());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tethered_capture_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("slow-gphoto2");
        std::fs::write(&script, "#!/bin/sh\nsleep 10\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let camera = GphotoCamera::new(
            CameraConfig::default()
                .with_binary(script.to_string_lossy())
                .with_tethered_timeout(Duration::from_secs(1)),
            tmp.path(),
        );
        camera.set_strategy(CaptureStrategy::D);

        let started = std::time::Instant::now();
        let err = camera.capture().await.unwrap_err();
        assert!(matches!(err, photobooth_core::Error::CaptureTimeout(1)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
