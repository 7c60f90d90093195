//! Typed API error for HTTP handlers.
//!
//! Converts service errors into proper HTTP responses with JSON body and
//! status codes. Handlers return `Result<Json<T>, ApiError>`; the response
//! body is always `{"error": "message"}` and internal detail is logged
//! server-side, never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use viewtrack_service::ServiceError;

/// API error with HTTP status code and human-readable message.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — payload is missing the slug.
    BadRequest(String),
    /// 405 Method Not Allowed — verb other than POST/OPTIONS.
    MethodNotAllowed,
    /// 429 Too Many Requests — client exhausted its window.
    RateLimited,
    /// 500 — the store increment failed. Details logged, not exposed.
    Upstream(ServiceError),
    /// 500 — unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_owned())
            },
            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded".to_owned()),
            Self::Upstream(err) => {
                tracing::error!(error = %err, "failed to track view");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to track view".to_owned())
            },
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::RateLimited { .. } => Self::RateLimited,
            ServiceError::Storage(_) => Self::Upstream(err),
        }
    }
}
