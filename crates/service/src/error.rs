//! Typed error enum for the service layer.

use thiserror::Error;
use viewtrack_storage::StorageError;

/// Service-layer error for the tracking pipeline.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided invalid input (missing slug).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Caller exhausted its rate-limit window.
    #[error("rate limit exceeded for client {key}")]
    RateLimited { key: String },
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::RateLimited { .. } => true,
            Self::InvalidInput(_) => false,
        }
    }
}
