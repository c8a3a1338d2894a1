//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Error body returned by every API route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) | ApiError::Internal(m) => m,
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<photobooth_core::Error> for ApiError {
    fn from(err: photobooth_core::Error) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            error!(error = %err, "Request failed");
            ApiError::Internal(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
