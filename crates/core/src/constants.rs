//! Shared constants for viewtrack.
//!
//! Centralizes tunables that would otherwise be duplicated across crates.

/// Rate limit window length in seconds.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Maximum accepted submissions per client key per window.
pub const RATE_LIMIT_MAX_REQUESTS: u32 = 10;

/// Rate-limit bucket for requests carrying no client identity and no
/// forwarded-for header. All anonymous traffic shares this one bucket.
pub const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// Total delivery attempts the beacon makes per submission.
pub const BEACON_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between beacon attempts in milliseconds. The wait before
/// attempt N+1 is `BEACON_RETRY_DELAY_MS * N` (linear backoff).
pub const BEACON_RETRY_DELAY_MS: u64 = 1000;

/// Beacon per-request timeout in seconds.
pub const BEACON_REQUEST_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Message returned on a successful tracking submission.
pub const TRACK_SUCCESS_MESSAGE: &str = "View tracked successfully";
