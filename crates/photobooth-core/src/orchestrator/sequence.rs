//! Capture sequence
//!
//! Countdown and shutter run on two timelines anchored to the same start
//! instant: the tick loop sleeps to exact one-second deadlines while a
//! separate task sleeps to the trigger offset and then calls the camera.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info};

use crate::activity_log::ActivityLog;
use crate::camera::{Camera, CaptureStrategy};
use crate::error::Error;
use crate::event::{Event, EventType};
use crate::imaging::PreviewReady;
use crate::storage::{Photo, ORIGINAL_DIR};

use super::core::Orchestrator;
use super::timing::trigger_offset;
use super::types::{BoothState, CountdownPayload, ErrorPayload};

/// Values read once at the start of a run
struct RunPlan {
    countdown: u32,
    delay_ms: i32,
    preview: Duration,
    strategy: CaptureStrategy,
    album_dir: PathBuf,
}

impl Orchestrator {
    fn plan_run(&self) -> RunPlan {
        let settings = self.settings.read().unwrap_or_else(|e| e.into_inner());
        RunPlan {
            countdown: settings.effective_countdown_seconds(),
            delay_ms: settings.trigger_delay_ms,
            preview: Duration::from_secs(u64::from(settings.effective_preview_seconds())),
            strategy: settings.active_strategy(),
            album_dir: settings.photos_base_path.join(&settings.current_album),
        }
    }

    /// Run one session from countdown to Idle
    pub(crate) async fn run_sequence(self: Arc<Self>, sequence: u64) {
        let plan = self.plan_run();
        let run_start = Instant::now();

        self.camera.set_strategy(plan.strategy);
        {
            let mut session = self.lock_session();
            session.countdown_total = plan.countdown;
            session.countdown_remaining = plan.countdown;
        }
        self.camera.prepare_capture();

        let offset = trigger_offset(plan.countdown, plan.delay_ms);
        self.activity.info(
            "trigger",
            format!(
                "Countdown {}s, shutter at {} ms (strategy {})",
                plan.countdown,
                offset.as_millis(),
                plan.strategy
            ),
        );

        let start = Instant::now();
        let camera = Arc::clone(&self.camera);
        let shutter = tokio::spawn(async move {
            sleep_until(start + offset).await;
            let fired = Instant::now();
            let result = camera.capture().await;
            (result, fired.elapsed())
        });

        for remaining in (0..=plan.countdown).rev() {
            let elapsed = u64::from(plan.countdown - remaining);
            sleep_until(start + Duration::from_secs(elapsed)).await;
            self.tick(remaining, plan.countdown);
        }

        self.set_state(BoothState::Capturing);

        let (result, capture_time) = match shutter.await {
            Ok(outcome) => outcome,
            Err(e) => (
                Err(Error::Internal(format!("capture task failed: {e}"))),
                Duration::ZERO,
            ),
        };

        let filename = match result {
            Ok(filename) => filename,
            Err(e) => {
                self.fail_capture(sequence, e).await;
                return;
            }
        };
        self.activity.info(
            "camera",
            format!("Captured {} in {} ms", filename, capture_time.as_millis()),
        );

        self.set_state(BoothState::Processing);

        let original = plan.album_dir.join(ORIGINAL_DIR).join(&filename);
        let process_start = Instant::now();
        let on_preview_ready = self.preview_callback(sequence, filename.clone(), &plan);
        if let Err(e) = self.imaging.process(&original, on_preview_ready).await {
            self.activity
                .error("imaging", format!("Processing {filename} failed: {e}"));
        }
        let process_time = process_start.elapsed();

        info!(
            sequence,
            filename = %filename,
            capture_ms = capture_time.as_millis() as u64,
            process_ms = process_time.as_millis() as u64,
            total_ms = run_start.elapsed().as_millis() as u64,
            "Session timings"
        );

        // no preview arrived; nothing to show
        if self.finish_if(sequence, BoothState::Processing) {
            self.activity
                .warn("imaging", format!("No preview for {filename}, back to idle"));
            return;
        }

        sleep(plan.preview).await;
        if self.finish_if(sequence, BoothState::Preview) {
            debug!(sequence, "Session finished");
        }
    }

    fn tick(&self, remaining: u32, total: u32) {
        let mut session = self.lock_session();
        session.countdown_remaining = remaining;
        self.hub.broadcast(Event::from_payload(
            EventType::Countdown,
            &CountdownPayload { remaining, total },
        ));
    }

    async fn fail_capture(&self, sequence: u64, error: Error) {
        let message = format!("Capture failed: {error}");
        self.activity.error("camera", &message);
        {
            let mut session = self.lock_session();
            session.state = BoothState::Error;
            self.publish_state(BoothState::Error);
            self.hub
                .broadcast(Event::from_payload(EventType::Error, &ErrorPayload { message }));
        }

        sleep(self.config.error_recovery).await;
        self.finish_if(sequence, BoothState::Error);
    }

    fn preview_callback(
        self: &Arc<Self>,
        sequence: u64,
        filename: String,
        plan: &RunPlan,
    ) -> PreviewReady {
        let this = Arc::clone(self);
        let strategy = plan.strategy;
        let album_dir = plan.album_dir.clone();
        let runtime = Handle::current();
        Box::new(move || this.on_preview_ready(sequence, filename, strategy, album_dir, &runtime))
    }

    fn on_preview_ready(
        &self,
        sequence: u64,
        filename: String,
        strategy: CaptureStrategy,
        album_dir: PathBuf,
        runtime: &Handle,
    ) {
        let photo = Photo::new(filename, Utc::now());
        {
            let mut session = self.lock_session();
            if session.state != BoothState::Processing || session.sequence != sequence {
                debug!(sequence, "Late preview ignored");
                return;
            }
            session.last_photo = Some(photo.clone());
            session.state = BoothState::Preview;
            self.publish_state(BoothState::Preview);
            self.hub
                .broadcast(Event::from_payload(EventType::PhotoReady, &photo));
        }
        self.activity
            .info("imaging", format!("Preview ready: {}", photo.filename));

        if self.config.verify_backups && strategy.retains_on_card() {
            runtime.spawn(verify_backup(
                Arc::clone(&self.camera),
                Arc::clone(&self.activity),
                self.config.backup_verify_delay,
                strategy,
                album_dir,
            ));
        }
    }
}

/// Check the camera's own copy and, for strategy B, fetch the RAW file once
/// that copy is confirmed.
/// Failures are logged only.
async fn verify_backup(
    camera: Arc<dyn Camera>,
    activity: Arc<ActivityLog>,
    delay: Duration,
    strategy: CaptureStrategy,
    album_dir: PathBuf,
) {
    sleep(delay).await;

    match camera.verify_last_capture().await {
        Ok(true) => debug!(%strategy, "Backup copy present on card"),
        Ok(false) => {
            activity.error("camera", "Backup copy missing on card");
            return;
        }
        Err(e) => {
            activity.warn("camera", format!("Backup check failed: {e}"));
            return;
        }
    }

    if strategy.downloads_raw_async() {
        match camera.download_latest_raw(&album_dir).await {
            Ok(()) => activity.info("camera", "RAW file downloaded"),
            Err(e) => activity.error("camera", format!("RAW download failed: {e}")),
        }
    }
}
