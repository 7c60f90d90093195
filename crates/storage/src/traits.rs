use async_trait::async_trait;

use crate::error::StorageError;

/// Operations the tracking endpoint needs from the shared store.
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Atomically add one to the slug's view counter.
    ///
    /// Must be a single round trip with no read-modify-write race: two
    /// simultaneous increments for the same slug are both reflected.
    /// Incrementing an unknown slug is a successful no-op.
    async fn increment_views(&self, slug: &str) -> Result<(), StorageError>;

    /// Current counter value for the slug.
    async fn view_count(&self, slug: &str) -> Result<i64, StorageError>;

    /// Register a post with a zero counter. Returns `true` if inserted,
    /// `false` if the slug already exists.
    async fn create_post(&self, slug: &str) -> Result<bool, StorageError>;
}
