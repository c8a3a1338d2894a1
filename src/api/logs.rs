//! Activity log endpoint

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use photobooth_core::{LogEntry, Orchestrator};
use serde::Deserialize;

const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// Most recent entries, oldest first
async fn get_logs(
    Extension(orchestrator): Extension<Arc<Orchestrator>>,
    Query(query): Query<LogsQuery>,
) -> Json<Vec<LogEntry>> {
    let limit = query.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT);
    Json(orchestrator.activity_log().entries(limit))
}

pub fn logs_routes() -> Router {
    Router::new().route("/api/logs", get(get_logs))
}
