//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use hbnb_core::CoreError;
use hbnb_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity or route not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request body or field (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Id already in use (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence failure (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 404 for an entity of `kind` that is not live.
    pub fn missing(kind: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{kind} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": ApiErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Core(core) => core.into(),
            StorageError::InvalidArgument { .. } => ApiError::BadRequest(err.to_string()),
            StorageError::DanglingReference { ref reference, .. } => {
                ApiError::missing(reference.kind)
            }
            StorageError::IdCollision { .. } => ApiError::Conflict(err.to_string()),
            _ => {
                error!(%err, "storage failure");
                ApiError::InternalError(err.to_string())
            }
        }
    }
}
