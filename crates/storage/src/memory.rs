//! In-memory storage backend.
//!
//! Mirrors the Postgres backend's semantics (unknown-slug increments are
//! no-ops, reads of unknown slugs are `NotFound`) so the service layer and
//! its tests behave identically against either backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::traits::ViewStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViewStore for MemoryStore {
    async fn increment_views(&self, slug: &str) -> Result<(), StorageError> {
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        if let Some(count) = posts.get_mut(slug) {
            *count += 1;
        }
        Ok(())
    }

    async fn view_count(&self, slug: &str) -> Result<i64, StorageError> {
        let posts = self.posts.lock().expect("posts mutex poisoned");
        posts
            .get(slug)
            .copied()
            .ok_or_else(|| StorageError::NotFound { entity: "post", id: slug.to_owned() })
    }

    async fn create_post(&self, slug: &str) -> Result<bool, StorageError> {
        let mut posts = self.posts.lock().expect("posts mutex poisoned");
        if posts.contains_key(slug) {
            return Ok(false);
        }
        posts.insert(slug.to_owned(), 0);
        Ok(true)
    }
}
