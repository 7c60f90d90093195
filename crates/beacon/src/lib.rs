//! Embeddable client beacon for viewtrack.
//!
//! Detects what is being viewed, deduplicates within a session, and
//! delivers tracking events with bounded retry. The automatic path never
//! surfaces errors to the embedder; the only observable effect of total
//! failure is the absence of a count increment.

mod error;
mod page;
mod state;
mod tracker;
#[cfg(test)]
mod tracker_tests;

pub use error::BeaconError;
pub use page::{extract_slug, is_development_host, resolve_site, Page};
pub use state::{BeaconState, FileState, MemoryState};
pub use tracker::{Tracker, TrackerConfig};
