//! Typed error enum for the beacon crate.

use thiserror::Error;

/// Errors from beacon delivery.
#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("all retry attempts failed, last error: {0}")]
    RetriesExhausted(Box<BeaconError>),
}
