//! Album maintenance endpoints

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use photobooth_core::Orchestrator;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct AlbumQuery {
    pub album: Option<String>,
}

impl AlbumQuery {
    /// Requested album, or the active one
    fn or_current(self, orchestrator: &Orchestrator) -> String {
        self.album
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| orchestrator.current_album())
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GalleryStatus {
    pub status: &'static str,
}

async fn gallery_count(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Query(query): Query<AlbumQuery>,
) -> ApiResult<Json<CountResponse>> {
    let album = query.or_current(&orchestrator);
    Ok(Json(CountResponse {
        count: orchestrator.gallery_count(&album)?,
    }))
}

async fn empty_gallery(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Query(query): Query<AlbumQuery>,
) -> ApiResult<Json<GalleryStatus>> {
    let album = query.or_current(&orchestrator);
    orchestrator.empty_gallery(&album)?;
    Ok(Json(GalleryStatus { status: "emptied" }))
}

async fn delete_gallery(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Query(query): Query<AlbumQuery>,
) -> ApiResult<Json<GalleryStatus>> {
    let album = query
        .album
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Album name required".to_string()))?;
    orchestrator.delete_gallery(&album)?;
    Ok(Json(GalleryStatus { status: "deleted" }))
}

pub fn gallery_routes() -> Router {
    Router::new()
        .route("/api/gallery/count", get(gallery_count))
        .route("/api/gallery/empty", post(empty_gallery))
        .route("/api/gallery/delete", post(delete_gallery))
}
