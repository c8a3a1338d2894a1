//! Photo listing and file serving
//!
//! `/photos/*` always resolves against the active album, so switching albums
//! switches what the gallery shows without restarting the file service.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Extension, Path as UrlPath, Request};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use photobooth_core::{Orchestrator, Photo};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::error::{ApiError, ApiResult};

async fn list_photos(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> ApiResult<Json<Vec<Photo>>> {
    Ok(Json(orchestrator.store().list()?))
}

async fn latest_photo(Extension(orchestrator): Extension<Arc<Orchestrator>>) -> ApiResult<Json<Photo>> {
    orchestrator
        .last_photo()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No photos found".to_string()))
}

/// Join `relative` onto `root`, refusing anything but plain path segments
fn resolve_photo_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain || relative.as_os_str().is_empty() {
        return None;
    }
    Some(root.join(relative))
}

async fn serve_photo(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    UrlPath(path): UrlPath<String>,
    request: Request,
) -> Response {
    let Some(file) = resolve_photo_path(&orchestrator.album_dir(), &path) else {
        return ApiError::NotFound("Photo not found".to_string()).into_response();
    };
    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

pub fn photos_routes() -> Router {
    Router::new()
        .route("/api/photos", get(list_photos))
        .route("/api/photos/latest", get(latest_photo))
        .route("/photos/*path", get(serve_photo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_photo_path() {
        let root = Path::new("/data/photos/party");
        assert_eq!(
            resolve_photo_path(root, "preview/IMG_1.jpg"),
            Some(PathBuf::from("/data/photos/party/preview/IMG_1.jpg"))
        );
        assert_eq!(resolve_photo_path(root, "../other/original/IMG_1.jpg"), None);
        assert_eq!(resolve_photo_path(root, "/etc/passwd"), None);
        assert_eq!(resolve_photo_path(root, ""), None);
    }
}
