//! Booth settings endpoints

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use photobooth_core::{AlbumInfo, BoothSettings, Orchestrator, SettingsUpdate};
use serde::Serialize;

use super::error::ApiResult;

/// Settings together with the album list
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub booth: BoothSettings,
    pub albums: Vec<AlbumInfo>,
}

fn settings_response(orchestrator: &Orchestrator, booth: BoothSettings) -> ApiResult<Json<SettingsResponse>> {
    Ok(Json(SettingsResponse {
        booth,
        albums: orchestrator.list_albums()?,
    }))
}

async fn get_settings(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> ApiResult<Json<SettingsResponse>> {
    settings_response(&orchestrator, orchestrator.settings())
}

/// Apply a partial update. Numbers are clamped; an unknown strategy is a 400
/// and leaves every setting untouched.
async fn update_settings(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<SettingsResponse>> {
    let booth = orchestrator.update_settings(update)?;
    settings_response(&orchestrator, booth)
}

pub fn settings_routes() -> Router {
    Router::new().route("/api/settings", get(get_settings).post(update_settings))
}
