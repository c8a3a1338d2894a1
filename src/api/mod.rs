//! Web API module for the photobooth
//!
//! Provides REST API endpoints for:
//! - Booth status, polling and remote trigger
//! - Photo listing and album file serving
//! - Settings and album maintenance
//! - Activity log

pub mod error;
pub mod gallery;
pub mod health;
pub mod logs;
pub mod photos;
pub mod settings;
pub mod status;

#[cfg(test)]
mod tests;

use axum::Router;

pub use gallery::gallery_routes;
pub use health::health_routes;
pub use logs::logs_routes;
pub use photos::photos_routes;
pub use settings::settings_routes;
pub use status::status_routes;

/// Create the API router with all endpoints
pub fn api_router() -> Router {
    Router::new()
        .merge(status_routes())
        .merge(photos_routes())
        .merge(settings_routes())
        .merge(gallery_routes())
        .merge(logs_routes())
}
