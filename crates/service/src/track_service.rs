use std::sync::Arc;

use viewtrack_core::{TrackViewRequest, UNKNOWN_CLIENT_KEY};
use viewtrack_storage::ViewStore;

use crate::error::ServiceError;
use crate::rate_limit::RateLimiter;

/// The tracking submission pipeline: validate, rate-limit, increment, read
/// back.
pub struct TrackService {
    store: Arc<dyn ViewStore>,
    limiter: RateLimiter,
}

impl TrackService {
    pub fn new(store: Arc<dyn ViewStore>, limiter: RateLimiter) -> Self {
        Self { store, limiter }
    }

    /// Process one submission and return the updated view count.
    ///
    /// The rate-limit key is the client identity when the beacon sent one,
    /// else the forwarded-for address, else the shared anonymous bucket.
    /// A charged window is not refunded when the increment fails.
    ///
    /// The read-back after a successful increment is best-effort telemetry:
    /// on failure it is logged and `0` is returned, since the counter itself
    /// already advanced.
    pub async fn track_view(
        &self,
        req: &TrackViewRequest,
        forwarded_for: Option<&str>,
    ) -> Result<i64, ServiceError> {
        if req.slug.is_empty() {
            return Err(ServiceError::InvalidInput("Blog slug is required".to_owned()));
        }

        let key = req.unique_id.as_deref().or(forwarded_for).unwrap_or(UNKNOWN_CLIENT_KEY);
        if !self.limiter.check(key) {
            tracing::warn!(slug = %req.slug, client = key, "rate limit exceeded");
            return Err(ServiceError::RateLimited { key: key.to_owned() });
        }

        tracing::info!(
            slug = %req.slug,
            website = req.website.as_deref().unwrap_or(""),
            client = key,
            "tracking view"
        );

        self.store.increment_views(&req.slug).await?;

        match self.store.view_count(&req.slug).await {
            Ok(count) => Ok(count),
            Err(e) => {
                tracing::warn!(slug = %req.slug, error = %e, "failed to fetch updated view count");
                Ok(0)
            },
        }
    }

    /// The rate limiter owned by this service.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
