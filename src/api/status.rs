//! Booth status and trigger endpoints

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use photobooth_core::{now_millis, BoothState, CountdownPayload, Orchestrator, Photo, StatusSnapshot};
use serde::Serialize;

/// Response of `POST /api/trigger`
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub status: &'static str,
}

/// Reduced status for polling clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyPoll {
    pub state: BoothState,
    pub last_photo: Option<Photo>,
    pub countdown: CountdownPayload,
    pub timestamp: i64,
}

async fn get_status(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> Json<StatusSnapshot> {
    Json(orchestrator.status())
}

/// Fire-and-forget: the response does not say whether the trigger was accepted
async fn trigger(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> Json<TriggerResponse> {
    orchestrator.trigger();
    Json(TriggerResponse { status: "triggered" })
}

async fn legacy_poll(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> Json<LegacyPoll> {
    let (remaining, total) = orchestrator.countdown();
    Json(LegacyPoll {
        state: orchestrator.state(),
        last_photo: orchestrator.last_photo(),
        countdown: CountdownPayload { remaining, total },
        timestamp: now_millis(),
    })
}

pub fn status_routes() -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/trigger", post(trigger))
        .route("/api/legacy/poll", get(legacy_poll))
}
