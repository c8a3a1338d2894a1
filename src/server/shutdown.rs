//! Graceful shutdown
//!
//! A single [`CancellationToken`] is cancelled on Ctrl+C or SIGTERM; the HTTP
//! server and background loops watch it.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

/// Resolve once a signal arrives or `token` is cancelled elsewhere.
///
/// Cancels `token` so every watcher stops.
pub async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        _ = wait_for_shutdown_signal() => {}
        _ = token.cancelled() => {}
    }
    info!("Shutting down");
    token.cancel();
}
