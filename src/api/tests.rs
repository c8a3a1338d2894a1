//! Router tests against a mock-camera booth

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use photobooth_core::Orchestrator;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::server::{build_orchestrator, build_router};
use crate::test_support::test_config;
use crate::websocket::WsSettings;

fn booth(tmp: &TempDir) -> (Arc<Orchestrator>, Router) {
    let orchestrator = build_orchestrator(&test_config(tmp.path())).unwrap();
    let router = build_router(
        orchestrator.clone(),
        WsSettings::default(),
        &tmp.path().join("no-frontend"),
    );
    (orchestrator, router)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn write_photo(album_dir: &Path, name: &str) {
    for sub in ["original", "preview", "thumb"] {
        let dir = album_dir.join(sub);
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbImage::new(8, 8).save(dir.join(name)).unwrap();
    }
}

#[tokio::test]
async fn test_health_and_status() {
    let tmp = TempDir::new().unwrap();
    let (_, router) = booth(&tmp);

    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["state"], "idle");

    let (status, body) = send(&router, "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "idle");
    assert_eq!(body["clients"], 0);
    assert_eq!(body["countdown"]["total"], 0);
    assert_eq!(body["currentAlbum"], "default");
    assert!(body["camera"]["model"].as_str().unwrap().contains("Mock"));
    assert!(body["lastPhoto"].is_null());
}

#[tokio::test]
async fn test_trigger_starts_countdown() {
    let tmp = TempDir::new().unwrap();
    let (orchestrator, router) = booth(&tmp);

    let (status, body) = send(&router, "POST", "/api/trigger", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "triggered");
    assert_eq!(orchestrator.state().as_str(), "countdown");

    // second trigger is accepted by HTTP but ignored by the booth
    let (status, _) = send(&router, "POST", "/api/trigger", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orchestrator.sequence(), 1);

    // let the spawned sequence record its countdown
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let (_, poll) = send(&router, "GET", "/api/legacy/poll", None).await;
    assert_eq!(poll["state"], "countdown");
    assert_eq!(poll["countdown"]["total"], 3);
    assert!(poll["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_photos_and_file_serving() {
    let tmp = TempDir::new().unwrap();
    let (orchestrator, router) = booth(&tmp);

    let (status, _) = send(&router, "GET", "/api/photos/latest", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    write_photo(&orchestrator.album_dir(), "IMG_20240101_120000.jpg");

    let (status, body) = send(&router, "GET", "/api/photos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["url"], "/photos/preview/IMG_20240101_120000.jpg");

    let (status, body) = send(&router, "GET", "/api/photos/latest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["thumbUrl"], "/photos/thumb/IMG_20240101_120000.jpg");

    let response = router
        .clone()
        .oneshot(
            Request::get("/photos/preview/IMG_20240101_120000.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = send(&router, "GET", "/photos/preview/missing.jpg", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_photo_serving_follows_album_switch() {
    let tmp = TempDir::new().unwrap();
    let (orchestrator, router) = booth(&tmp);
    write_photo(&orchestrator.album_dir(), "IMG_1.jpg");

    let (status, body) = send(
        &router,
        "POST",
        "/api/settings",
        Some(serde_json::json!({ "currentAlbum": "Summer Party" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booth"]["currentAlbum"], "summer_party");

    let (status, _) = send(&router, "GET", "/photos/preview/IMG_1.jpg", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_update_and_validation() {
    let tmp = TempDir::new().unwrap();
    let (_, router) = booth(&tmp);

    let (status, body) = send(&router, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booth"]["countdownSeconds"], 3);
    assert_eq!(body["albums"][0]["id"], "default");

    let (status, body) = send(
        &router,
        "POST",
        "/api/settings",
        Some(serde_json::json!({
            "countdownSeconds": 42,
            "previewDisplaySeconds": 0,
            "triggerDelayMs": -5000,
            "captureStrategy": "b"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booth"]["countdownSeconds"], 10);
    assert_eq!(body["booth"]["previewDisplaySeconds"], 1);
    assert_eq!(body["booth"]["triggerDelayMs"], -3000);
    assert_eq!(body["booth"]["albumCaptureMethods"]["default"], "B");

    let (status, body) = send(
        &router,
        "POST",
        "/api/settings",
        Some(serde_json::json!({ "countdownSeconds": 5, "captureStrategy": "Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("captureStrategy"));

    let (_, body) = send(&router, "GET", "/api/settings", None).await;
    assert_eq!(body["booth"]["countdownSeconds"], 10);
}

#[tokio::test]
async fn test_gallery_rules() {
    let tmp = TempDir::new().unwrap();
    let (orchestrator, router) = booth(&tmp);
    write_photo(&orchestrator.album_dir(), "IMG_1.jpg");
    write_photo(&orchestrator.album_dir(), "IMG_2.jpg");

    let (_, body) = send(&router, "GET", "/api/gallery/count", None).await;
    assert_eq!(body["count"], 2);

    let (status, body) = send(&router, "POST", "/api/gallery/delete", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Album name required");

    let (status, _) = send(&router, "POST", "/api/gallery/delete?album=default", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&router, "POST", "/api/gallery/empty?album=default", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "emptied");
    let (_, body) = send(&router, "GET", "/api/gallery/count?album=default", None).await;
    assert_eq!(body["count"], 0);

    std::fs::create_dir_all(tmp.path().join("old_event/original")).unwrap();
    let (status, body) = send(&router, "POST", "/api/gallery/delete?album=Old%20Event", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");
    assert!(!tmp.path().join("old_event").exists());
}

#[tokio::test]
async fn test_logs_limit() {
    let tmp = TempDir::new().unwrap();
    let (orchestrator, router) = booth(&tmp);
    for i in 0..5 {
        orchestrator.activity_log().info("test", format!("entry {i}"));
    }

    let (status, body) = send(&router, "GET", "/api/logs?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["message"], "entry 4");

    let (_, body) = send(&router, "GET", "/api/logs", None).await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_spa_fallback() {
    let tmp = TempDir::new().unwrap();
    let frontend = tmp.path().join("frontend");
    std::fs::create_dir_all(&frontend).unwrap();
    std::fs::write(frontend.join("index.html"), "<html>booth</html>").unwrap();

    let orchestrator = build_orchestrator(&test_config(&tmp.path().join("photos"))).unwrap();
    let router = build_router(orchestrator, WsSettings::default(), &frontend);

    let response = router
        .oneshot(Request::get("/gallery/anything").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>booth</html>");
}
