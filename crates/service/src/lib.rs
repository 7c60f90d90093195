//! Business logic layer for the tracking endpoint.
//!
//! The HTTP crate stays thin: handlers hand the decoded request to
//! [`TrackService`], which validates it, charges the caller's rate-limit
//! window, performs the atomic increment, and reads the counter back.

mod error;
mod rate_limit;
mod track_service;

pub use error::ServiceError;
pub use rate_limit::{RateLimitWindow, RateLimiter};
pub use track_service::TrackService;
