use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use viewtrack_core::{
    TrackViewRequest, TrackViewResponse, BEACON_REQUEST_TIMEOUT_SECS, BEACON_RETRY_ATTEMPTS,
    BEACON_RETRY_DELAY_MS,
};

use crate::error::BeaconError;
use crate::page::{extract_slug, is_development_host, resolve_site, Page};
use crate::state::BeaconState;

/// Tunables for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Tracking endpoint URL.
    pub endpoint: String,
    /// Total delivery attempts per submission.
    pub retry_attempts: u32,
    /// Base delay between attempts; the wait before attempt N+1 is
    /// `retry_delay × N` (linear backoff).
    pub retry_delay: Duration,
}

impl TrackerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            retry_attempts: BEACON_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(BEACON_RETRY_DELAY_MS),
        }
    }
}

/// The client beacon.
///
/// Constructed with injected state so embedders control where identity and
/// the session set live; the transport is reqwest with a per-request
/// timeout. One tracker instance serves a whole session.
pub struct Tracker {
    config: TrackerConfig,
    client: reqwest::Client,
    state: Arc<dyn BeaconState>,
    disabled: AtomicBool,
}

impl Tracker {
    /// Creates a tracker for the given endpoint and state.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// failure).
    pub fn new(config: TrackerConfig, state: Arc<dyn BeaconState>) -> Result<Self, BeaconError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(BEACON_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| BeaconError::ClientInit(e.to_string()))?;
        Ok(Self { config, client, state, disabled: AtomicBool::new(false) })
    }

    /// Turn automatic tracking off at runtime.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }

    /// Turn automatic tracking back on.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Durable client identity, generated and persisted on first use.
    pub fn client_identity(&self) -> String {
        if let Some(id) = self.state.client_id() {
            return id;
        }
        let id = generate_client_id();
        self.state.set_client_id(&id);
        id
    }

    /// Automatic per-page tracking.
    ///
    /// Skips silently when tracking is disabled, the host is a development
    /// loopback, the page has no resolvable slug, or the slug was already
    /// reported this session. All delivery failures are logged and
    /// swallowed; nothing propagates to the embedder.
    pub async fn track_page(&self, page: &Page) {
        if self.is_disabled() || is_development_host(&page.hostname) {
            tracing::debug!(hostname = %page.hostname, "tracking disabled");
            return;
        }
        let Some(slug) = extract_slug(page) else {
            tracing::debug!(path = %page.path, "no slug detected");
            return;
        };
        if self.state.was_tracked(&slug) {
            tracing::debug!(slug, "view already tracked this session");
            return;
        }

        let website = resolve_site(page);
        match self.deliver(&slug, &website).await {
            Ok(resp) => {
                self.state.mark_tracked(&slug);
                tracing::info!(slug, view_count = resp.view_count, "view tracked");
            },
            Err(e) => {
                tracing::error!(slug, error = %e, "failed to track view");
            },
        }
    }

    /// Imperative single-slug tracking.
    ///
    /// Always sends, bypassing the session dedup set, and returns the
    /// delivery outcome to the caller.
    pub async fn track_slug(
        &self,
        slug: &str,
        website: &str,
    ) -> Result<TrackViewResponse, BeaconError> {
        self.deliver(slug, website).await
    }

    async fn deliver(&self, slug: &str, website: &str) -> Result<TrackViewResponse, BeaconError> {
        let request = TrackViewRequest {
            slug: slug.to_owned(),
            website: Some(website.to_owned()),
            unique_id: Some(self.client_identity()),
        };

        let mut last_error: Option<BeaconError> = None;
        for attempt in 1..=self.config.retry_attempts {
            if attempt > 1 {
                tokio::time::sleep(self.backoff_delay(attempt - 1)).await;
            }
            match self.send_once(&request).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    tracing::warn!(slug, attempt, error = %e, "delivery attempt failed");
                    last_error = Some(e);
                },
            }
        }
        Err(BeaconError::RetriesExhausted(Box::new(last_error.unwrap_or_else(|| {
            BeaconError::ClientInit("no delivery attempts configured".to_owned())
        }))))
    }

    async fn send_once(
        &self,
        request: &TrackViewRequest,
    ) -> Result<TrackViewResponse, BeaconError> {
        let response = self.client.post(&self.config.endpoint).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(BeaconError::HttpStatus { code: status.as_u16(), body });
        }
        Ok(response.json::<TrackViewResponse>().await?)
    }

    /// Wait after `failed_attempts` failures: linear in the attempt number.
    fn backoff_delay(&self, failed_attempts: u32) -> Duration {
        self.config.retry_delay * failed_attempts
    }
}

/// A fresh `client_<timestamp>_<random>` identity.
fn generate_client_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("client_{millis}_{suffix}")
}

#[cfg(test)]
mod tests {
    use crate::state::MemoryState;

    use super::*;

    #[test]
    fn test_backoff_is_linear_in_attempt_number() {
        let mut config = TrackerConfig::new("http://127.0.0.1/track-view");
        config.retry_delay = Duration::from_millis(1000);
        let tracker = Tracker::new(config, Arc::new(MemoryState::new())).unwrap();
        assert_eq!(tracker.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(tracker.backoff_delay(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_generated_identity_shape() {
        let id = generate_client_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "client");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_identity_is_generated_once_and_reused() {
        let config = TrackerConfig::new("http://127.0.0.1/track-view");
        let tracker = Tracker::new(config, Arc::new(MemoryState::new())).unwrap();
        let first = tracker.client_identity();
        let second = tracker.client_identity();
        assert_eq!(first, second);
    }

    #[test]
    fn test_enable_disable_toggles() {
        let config = TrackerConfig::new("http://127.0.0.1/track-view");
        let tracker = Tracker::new(config, Arc::new(MemoryState::new())).unwrap();
        assert!(!tracker.is_disabled());
        tracker.disable();
        assert!(tracker.is_disabled());
        tracker.enable();
        assert!(!tracker.is_disabled());
    }
}
