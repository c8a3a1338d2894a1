//! Server initialization and main run loop
//!
//! Contains the main `run()` function that starts all server components.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{routing::get, Extension, Router};
use photobooth_camera::GphotoCamera;
use photobooth_core::{ActivityLog, Camera, EventHub, ImageProcessor, Orchestrator};
use photobooth_imaging::ResizeProcessor;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::background_tasks::{start_camera_info_task, RefreshIntervals};
use super::config::AppConfig;
use super::loader::load_config;
use super::shutdown::shutdown_signal;
use super::validation::validate_config;
use crate::websocket::WsSettings;

/// Wire the orchestrator and its collaborators from configuration
pub fn build_orchestrator(config: &AppConfig) -> Result<Arc<Orchestrator>> {
    let activity = Arc::new(ActivityLog::new(config.hub.log_capacity));
    let hub = Arc::new(EventHub::new(config.hub.queue_capacity));

    let settings = config.booth.to_settings();
    let album_dir = settings.photos_base_path.join(&settings.current_album);
    let camera: Arc<dyn Camera> = Arc::new(GphotoCamera::new(config.camera.driver_config(), album_dir));
    let imaging: Arc<dyn ImageProcessor> = Arc::new(ResizeProcessor::new(config.image.imaging_config()));

    let orchestrator = Arc::new(Orchestrator::new(settings, hub, camera, imaging).with_activity_log(activity));
    orchestrator.attach_to_hub();
    orchestrator
        .ensure_album_dirs()
        .with_context(|| format!("Failed to create album directory {}", orchestrator.album_dir().display()))?;

    Ok(orchestrator)
}

/// Build the HTTP router
pub fn build_router(orchestrator: Arc<Orchestrator>, ws: WsSettings, frontend_dir: &Path) -> Router {
    let app = Router::new()
        .merge(crate::api::health_routes())
        .merge(crate::api::api_router())
        .merge(crate::websocket::websocket_router())
        .layer(Extension(orchestrator))
        .layer(Extension(ws))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Serve static files, fallback to index.html for SPA routing
    if frontend_dir.is_dir() {
        info!("Frontend enabled: serving from {}", frontend_dir.display());
        let serve_dir = ServeDir::new(frontend_dir)
            .append_index_html_on_directories(true)
            .fallback(ServeFile::new(frontend_dir.join("index.html")));
        app.fallback_service(serve_dir)
    } else {
        warn!("Frontend directory {} not found", frontend_dir.display());
        app.route("/", get(|| async { "Photobooth" }))
    }
}

/// Load configuration and run the server until a shutdown signal
pub async fn run() -> Result<()> {
    info!("Starting Photobooth v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config().context("Failed to load configuration")?;
    validate_config(&mut config)?;
    info!("Configuration loaded");

    let orchestrator = build_orchestrator(&config)?;
    info!(
        album = %orchestrator.current_album(),
        dir = %orchestrator.album_dir().display(),
        strategy = %orchestrator.settings().active_strategy(),
        "Orchestrator initialized"
    );
    orchestrator
        .activity_log()
        .info("system", "Photobooth application initialized");

    let shutdown = CancellationToken::new();

    let info_task = if config.camera.enabled {
        Some(start_camera_info_task(
            orchestrator.clone(),
            RefreshIntervals {
                connected: Duration::from_secs(config.camera.info_refresh_secs.max(1)),
                disconnected: Duration::from_secs(config.camera.info_refresh_disconnected_secs.max(1)),
            },
            shutdown.clone(),
        ))
    } else {
        info!("Camera info refresh disabled by configuration");
        None
    };

    let ws = WsSettings {
        ping_interval: Duration::from_secs(config.hub.ping_interval_secs),
        write_timeout: Duration::from_secs(config.hub.write_timeout_secs),
    };
    let app = build_router(orchestrator.clone(), ws, &config.frontend.dir);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("HTTP server error")?;

    if let Some(task) = info_task {
        if tokio::time::timeout(Duration::from_secs(5), task).await.is_err() {
            warn!("Camera info task shutdown timeout");
        }
    }

    info!("Photobooth shutdown complete");
    Ok(())
}
