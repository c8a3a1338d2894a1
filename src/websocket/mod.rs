//! WebSocket module for the photobooth
//!
//! - /ws - booth event stream and remote trigger

pub mod booth;

pub use booth::{booth_ws_handler, WsSettings};


use axum::{routing::get, Router};

/// Create the WebSocket router
pub fn websocket_router() -> Router {
    Router::new().route("/ws", get(booth_ws_handler))
}
