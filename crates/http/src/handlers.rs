use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use viewtrack_core::{TrackViewRequest, TrackViewResponse, TRACK_SUCCESS_MESSAGE};

use crate::api_error::ApiError;
use crate::AppState;

pub async fn track_view(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<TrackViewRequest>,
) -> Result<Json<TrackViewResponse>, ApiError> {
    let forwarded_for = client_ip(&headers);
    let view_count = state.track_service.track_view(&req, forwarded_for.as_deref()).await?;
    Ok(Json(TrackViewResponse {
        success: true,
        view_count,
        message: TRACK_SUCCESS_MESSAGE.to_owned(),
    }))
}

/// Non-preflight OPTIONS probes get the same empty success a preflight does.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// First entry of `x-forwarded-for`, used as the rate-limit key for
/// submissions that carry no client identity.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}
