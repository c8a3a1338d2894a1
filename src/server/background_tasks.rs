//! Background task startup functions
//!
//! Camera info refresh and `system` event broadcast.

use std::sync::Arc;
use std::time::Duration;

use photobooth_core::{BoothState, Event, EventType, Orchestrator, SystemPayload};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Delay before the first camera probe
const FIRST_REFRESH_DELAY: Duration = Duration::from_secs(2);

/// Refresh cadence
#[derive(Debug, Clone, Copy)]
pub struct RefreshIntervals {
    /// While a camera answers
    pub connected: Duration,
    /// While no camera answers
    pub disconnected: Duration,
}

/// Start the camera info refresh loop.
///
/// The camera is only probed while the booth is idle so the USB link is
/// never shared with a capture. A `system` event goes out every cycle.
pub fn start_camera_info_task(
    orchestrator: Arc<Orchestrator>,
    intervals: RefreshIntervals,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let handle = tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(FIRST_REFRESH_DELAY) => {}
            _ = shutdown.cancelled() => return,
        }
        orchestrator.camera().refresh_info().await;

        loop {
            let interval = if orchestrator.camera().is_connected() {
                intervals.connected
            } else {
                intervals.disconnected
            };

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown.cancelled() => {
                    info!("Camera info task shutting down");
                    break;
                }
            }

            if orchestrator.state() == BoothState::Idle {
                orchestrator.camera().refresh_info().await;
            } else {
                debug!(state = %orchestrator.state(), "Skipping camera refresh while busy");
            }
            broadcast_system(&orchestrator);
        }
    });
    info!(
        connected_secs = intervals.connected.as_secs(),
        disconnected_secs = intervals.disconnected.as_secs(),
        "Camera info task started"
    );
    handle
}

/// Publish camera and disk information to every client
pub fn broadcast_system(orchestrator: &Orchestrator) -> usize {
    let payload = SystemPayload {
        camera: orchestrator.camera().cached_info(),
        disk: orchestrator.disk_usage(),
    };
    orchestrator
        .hub()
        .broadcast(Event::from_payload(EventType::System, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingCamera;
    use photobooth_core::{BoothSettings, EventHub};
    use photobooth_imaging::ResizeProcessor;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn setup(tmp: &TempDir, connected: bool) -> (Arc<Orchestrator>, Arc<CountingCamera>) {
        let camera = Arc::new(CountingCamera::default());
        camera.connected.store(connected, Ordering::SeqCst);
        let settings = BoothSettings {
            photos_base_path: tmp.path().to_path_buf(),
            ..BoothSettings::default()
        };
        let orchestrator = Arc::new(Orchestrator::new(
            settings,
            Arc::new(EventHub::default()),
            camera.clone(),
            Arc::new(ResizeProcessor::default()),
        ));
        (orchestrator, camera)
    }

    const INTERVALS: RefreshIntervals = RefreshIntervals {
        connected: Duration::from_secs(10),
        disconnected: Duration::from_secs(2),
    };

    #[tokio::test(start_paused = true)]
    async fn test_refresh_cadence_while_disconnected() {
        let tmp = TempDir::new().unwrap();
        let (orchestrator, camera) = setup(&tmp, false);
        let mut sub = orchestrator.hub().register();
        let shutdown = CancellationToken::new();
        let task = start_camera_info_task(orchestrator, INTERVALS, shutdown.clone());

        // first probe at 2 s, then every 2 s: 2, 4, 6, 8
        tokio::time::sleep(Duration::from_millis(8500)).await;
        assert_eq!(camera.refreshes.load(Ordering::SeqCst), 4);

        let event = sub.receiver.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::System);
        assert_eq!(event.data["camera"]["connected"], false);

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_cadence_while_connected() {
        let tmp = TempDir::new().unwrap();
        let (orchestrator, camera) = setup(&tmp, true);
        let shutdown = CancellationToken::new();
        let task = start_camera_info_task(orchestrator, INTERVALS, shutdown.clone());

        // first probe at 2 s, next at 12 s
        tokio::time::sleep(Duration::from_millis(11_500)).await;
        assert_eq!(camera.refreshes.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(camera.refreshes.load(Ordering::SeqCst), 2);

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_probe_after_shutdown() {
        let tmp = TempDir::new().unwrap();
        let (orchestrator, camera) = setup(&tmp, false);
        let shutdown = CancellationToken::new();
        let task = start_camera_info_task(orchestrator, INTERVALS, shutdown.clone());

        shutdown.cancel();
        task.await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(camera.refreshes.load(Ordering::SeqCst), 0);
    }
}
