//! HTTP API server for viewtrack.
//!
//! The single substantive route is the tracking endpoint; the beacon is
//! embedded on arbitrary third-party origins, so every response (errors
//! included) carries permissive CORS headers.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]

pub mod api_error;
mod api_types;
mod handlers;

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use viewtrack_service::TrackService;

pub use api_types::VersionResponse;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// The submission pipeline behind the tracking endpoint.
    pub track_service: Arc<TrackService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route(
            "/track-view",
            post(handlers::track_view)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Wildcard-origin CORS, mirroring what embedding on arbitrary sites needs.
///
/// Browser preflights are answered by this layer before they reach the
/// router; the explicit OPTIONS handler covers non-preflight probes.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
