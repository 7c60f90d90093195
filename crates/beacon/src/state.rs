//! Beacon-side persistent and session state.
//!
//! Two lifetimes, mirroring the browser storage split: the client identity
//! survives across sessions, while the set of already-reported slugs is
//! scoped to one session and vanishes with it.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Where the beacon keeps its durable client identity and the
/// session-scoped set of already-reported slugs.
///
/// Storage failures are not propagated: a beacon that cannot persist
/// degrades to generating a fresh identity next session, which only costs
/// rate-limit-key continuity.
pub trait BeaconState: Send + Sync {
    /// Durable client identity, if one has been stored.
    fn client_id(&self) -> Option<String>;
    /// Persist the client identity for future sessions.
    fn set_client_id(&self, id: &str);
    /// Whether the slug was already reported this session.
    fn was_tracked(&self, slug: &str) -> bool;
    /// Record that the slug was reported this session.
    fn mark_tracked(&self, slug: &str);
}

/// Purely in-memory state. Identity and session set both die with the
/// process; used in tests and short-lived embedders.
#[derive(Debug, Default)]
pub struct MemoryState {
    client_id: Mutex<Option<String>>,
    tracked: Mutex<HashSet<String>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BeaconState for MemoryState {
    fn client_id(&self) -> Option<String> {
        self.client_id.lock().expect("client id mutex poisoned").clone()
    }

    fn set_client_id(&self, id: &str) {
        *self.client_id.lock().expect("client id mutex poisoned") = Some(id.to_owned());
    }

    fn was_tracked(&self, slug: &str) -> bool {
        self.tracked.lock().expect("tracked set mutex poisoned").contains(slug)
    }

    fn mark_tracked(&self, slug: &str) {
        self.tracked.lock().expect("tracked set mutex poisoned").insert(slug.to_owned());
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    client_id: Option<String>,
}

/// File-backed state: the client identity is stored as JSON under the user
/// data dir, the session set stays in process memory.
#[derive(Debug)]
pub struct FileState {
    path: PathBuf,
    tracked: Mutex<HashSet<String>>,
}

impl FileState {
    /// State file under the platform data dir.
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("viewtrack")
            .join("state.json");
        Self::with_path(path)
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path, tracked: Mutex::new(HashSet::new()) }
    }

    fn read(&self) -> StateFile {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt state file");
                StateFile::default()
            }),
            Err(_) => StateFile::default(),
        }
    }

    fn write(&self, state: &StateFile) {
        let json = match serde_json::to_string_pretty(state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode state");
                return;
            },
        };
        let result = self
            .path
            .parent()
            .map(std::fs::create_dir_all)
            .unwrap_or(Ok(()))
            .and_then(|()| std::fs::write(&self.path, json));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist state");
        }
    }
}

impl Default for FileState {
    fn default() -> Self {
        Self::new()
    }
}

impl BeaconState for FileState {
    fn client_id(&self) -> Option<String> {
        self.read().client_id
    }

    fn set_client_id(&self, id: &str) {
        let mut state = self.read();
        state.client_id = Some(id.to_owned());
        self.write(&state);
    }

    fn was_tracked(&self, slug: &str) -> bool {
        self.tracked.lock().expect("tracked set mutex poisoned").contains(slug)
    }

    fn mark_tracked(&self, slug: &str) {
        self.tracked.lock().expect("tracked set mutex poisoned").insert(slug.to_owned());
    }
}
