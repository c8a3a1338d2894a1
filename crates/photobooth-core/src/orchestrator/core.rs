//! Orchestrator core structure
//!
//! Contains the `Orchestrator` struct, its builder methods, the trigger entry
//! point and the read-only queries.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::{debug, info};

use crate::activity_log::ActivityLog;
use crate::camera::Camera;
use crate::disk::DiskUsage;
use crate::event::{Event, EventType};
use crate::event_hub::EventHub;
use crate::imaging::ImageProcessor;
use crate::settings::BoothSettings;
use crate::storage::{Photo, PhotoStore};

use super::config::OrchestratorConfig;
use super::timing::format_uptime;
use super::types::{BoothSession, BoothState, CountdownPayload, StatusPayload, StatusSnapshot};

/// Drives booth sessions and publishes every transition to the hub
pub struct Orchestrator {
    pub(crate) session: Mutex<BoothSession>,
    pub(crate) settings: RwLock<BoothSettings>,
    pub(crate) hub: Arc<EventHub>,
    pub(crate) camera: Arc<dyn Camera>,
    pub(crate) imaging: Arc<dyn ImageProcessor>,
    pub(crate) store: Arc<PhotoStore>,
    pub(crate) activity: Arc<ActivityLog>,
    pub(crate) config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create an orchestrator for the given settings and collaborators.
    ///
    /// Settings are normalized; the camera and photo store are pointed at
    /// the active album directory.
    #[must_use]
    pub fn new(
        mut settings: BoothSettings,
        hub: Arc<EventHub>,
        camera: Arc<dyn Camera>,
        imaging: Arc<dyn ImageProcessor>,
    ) -> Self {
        settings.normalize();
        let album_dir = settings.photos_base_path.join(&settings.current_album);
        camera.set_data_dir(&album_dir);
        camera.set_strategy(settings.active_strategy());

        Self {
            session: Mutex::new(BoothSession::new()),
            store: Arc::new(PhotoStore::new(album_dir)),
            settings: RwLock::new(settings),
            hub,
            camera,
            imaging,
            activity: Arc::new(ActivityLog::default()),
            config: OrchestratorConfig::default(),
        }
    }

    /// Use a shared activity log
    #[must_use]
    pub fn with_activity_log(mut self, activity: Arc<ActivityLog>) -> Self {
        self.activity = activity;
        self
    }

    /// Override sequence timings
    #[must_use]
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire the hub's remote trigger to this orchestrator and route activity
    /// log entries to the hub.
    ///
    /// The hub only holds a weak reference back to the orchestrator.
    pub fn attach_to_hub(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.hub.set_trigger_handler(Arc::new(move || {
            if let Some(orchestrator) = weak.upgrade() {
                orchestrator.trigger();
            }
        }));
        self.activity.set_sink(self.hub.clone());
        debug!("Orchestrator attached to event hub");
    }

    pub(crate) fn lock_session(&self) -> MutexGuard<'_, BoothSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a booth session.
    ///
    /// Accepted only from Idle or Preview; otherwise logs a warning and
    /// returns `false`. The sequence runs on its own task and this call
    /// returns immediately. Must be called from within a Tokio runtime.
    pub fn trigger(self: &Arc<Self>) -> bool {
        let accepted = {
            let mut session = self.lock_session();
            if session.state.accepts_trigger() {
                session.sequence += 1;
                session.state = BoothState::Countdown;
                self.publish_state(BoothState::Countdown);
                Ok(session.sequence)
            } else {
                Err(session.state)
            }
        };

        match accepted {
            Ok(sequence) => {
                info!(sequence, "Trigger accepted");
                let this = Arc::clone(self);
                tokio::spawn(async move { this.run_sequence(sequence).await });
                true
            }
            Err(state) => {
                self.activity
                    .warn("trigger", format!("Trigger ignored, booth is {state}"));
                false
            }
        }
    }

    /// Transition to `state` and broadcast it
    pub(crate) fn set_state(&self, state: BoothState) {
        let mut session = self.lock_session();
        session.state = state;
        self.publish_state(state);
    }

    /// Return to Idle if the session is still `expected` and has not been
    /// superseded by a newer trigger
    pub(crate) fn finish_if(&self, sequence: u64, expected: BoothState) -> bool {
        let mut session = self.lock_session();
        if session.state != expected || session.sequence != sequence {
            debug!(
                sequence,
                current = session.sequence,
                state = %session.state,
                "Stale finish ignored"
            );
            return false;
        }
        session.state = BoothState::Idle;
        self.publish_state(BoothState::Idle);
        true
    }

    /// Broadcast a `status` event. Callers hold the session lock so events
    /// leave in transition order.
    pub(crate) fn publish_state(&self, state: BoothState) {
        self.hub
            .broadcast(Event::from_payload(EventType::Status, &StatusPayload { state }));
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> BoothState {
        self.lock_session().state
    }

    /// Number of accepted triggers so far
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.lock_session().sequence
    }

    /// Countdown `(remaining, total)` in seconds
    #[must_use]
    pub fn countdown(&self) -> (u32, u32) {
        let session = self.lock_session();
        (session.countdown_remaining, session.countdown_total)
    }

    /// Most recent photo of this process, else the newest stored photo
    #[must_use]
    pub fn last_photo(&self) -> Option<Photo> {
        let recorded = self.lock_session().last_photo.clone();
        recorded.or_else(|| self.store.latest().ok().flatten())
    }

    /// Process uptime, `MM:SS` or `HH:MM:SS`
    #[must_use]
    pub fn uptime(&self) -> String {
        format_uptime(self.lock_session().start_time.elapsed())
    }

    /// Connected client count (advisory)
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.hub.client_count()
    }

    /// Disk usage of the photo volume
    #[must_use]
    pub fn disk_usage(&self) -> Option<DiskUsage> {
        DiskUsage::for_path(&self.base_path()).ok()
    }

    /// Full status snapshot
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        let (state, remaining, total, uptime) = {
            let session = self.lock_session();
            (
                session.state,
                session.countdown_remaining,
                session.countdown_total,
                format_uptime(session.start_time.elapsed()),
            )
        };

        StatusSnapshot {
            state,
            clients: self.client_count(),
            uptime,
            camera: self.camera.cached_info(),
            disk: self.disk_usage(),
            last_photo: self.last_photo(),
            countdown: CountdownPayload { remaining, total },
            current_album: self.current_album(),
        }
    }

    /// Copy of the current settings
    #[must_use]
    pub fn settings(&self) -> BoothSettings {
        self.settings.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Active album id
    #[must_use]
    pub fn current_album(&self) -> String {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .current_album
            .clone()
    }

    pub(crate) fn base_path(&self) -> PathBuf {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .photos_base_path
            .clone()
    }

    /// Shared event hub
    #[must_use]
    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    /// Shared camera
    #[must_use]
    pub fn camera(&self) -> &Arc<dyn Camera> {
        &self.camera
    }

    /// Photo store of the active album
    #[must_use]
    pub fn store(&self) -> &Arc<PhotoStore> {
        &self.store
    }

    /// Activity log
    #[must_use]
    pub fn activity_log(&self) -> &Arc<ActivityLog> {
        &self.activity
    }
}
