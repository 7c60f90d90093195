//! Per-client rate limiting for the tracking endpoint.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One client key's counting window.
///
/// `count` covers submissions since the window opened; once `reset_at`
/// passes, the next submission starts a fresh window of 1.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitWindow {
    pub count: u32,
    pub reset_at: Instant,
}

/// Fixed-size counting window per client key, reset wholesale on expiry.
///
/// The window table is owned state of this value, guarded by a mutex, and
/// lives for the process: entries are never pruned, so one entry accumulates
/// per client key ever seen. Enforcement is per process instance;
/// deployments needing global enforcement must relocate the windows into the
/// shared store (see [`RateLimiter::windows`]).
pub struct RateLimiter {
    windows: Mutex<HashMap<String, RateLimitWindow>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { windows: Mutex::new(HashMap::new()), max_requests, window }
    }

    /// Count a submission for `key` and report whether it is within quota.
    ///
    /// The submission is charged to the window even when rejected, and a
    /// charge is never refunded if downstream work fails.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// As [`check`](Self::check), with an explicit notion of "now".
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().expect("rate limit table mutex poisoned");
        let entry = windows
            .entry(key.to_owned())
            .or_insert(RateLimitWindow { count: 0, reset_at: now + self.window });
        if now > entry.reset_at {
            entry.count = 1;
            entry.reset_at = now + self.window;
        } else {
            entry.count += 1;
        }
        entry.count <= self.max_requests
    }

    /// Snapshot of the current windows, for inspection or relocation into an
    /// external store.
    pub fn windows(&self) -> Vec<(String, RateLimitWindow)> {
        let windows = self.windows.lock().expect("rate limit table mutex poisoned");
        windows.iter().map(|(k, w)| (k.clone(), *w)).collect()
    }
}
