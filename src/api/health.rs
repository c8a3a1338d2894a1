//! Health check endpoint

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use photobooth_core::{BoothState, Orchestrator};
use serde::Serialize;

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub state: BoothState,
    pub camera_connected: bool,
}

/// Health check (for supervisors and load balancers)
async fn health_check(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        state: orchestrator.state(),
        camera_connected: orchestrator.camera().is_connected(),
    })
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}
