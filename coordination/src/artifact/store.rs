//! In-memory, append-only artifact store.
//!
//! One store lives for one coordination session and is shared by `Arc`
//! between the coordinator session, the final-answer middleware and every
//! handoff tool built for that session. Artifacts are immutable: there is no
//! update or delete, a revision is a new artifact with a new id.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::errors::{ArtifactError, ArtifactResult};

/// Default id prefix, matching ids like `art_3f9c01ab`.
pub const DEFAULT_ID_PREFIX: &str = "art";

/// Number of hex characters in the random part of an id.
const ID_SUFFIX_LEN: usize = 8;

/// Opaque artifact identifier, unique within one store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Wrap an id taken from a reference tag or another external source.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A stored piece of agent output plus the creator's one-line summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub content: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// Shared reference to a session's store.
pub type SharedArtifactStore = Arc<ArtifactStore>;

struct StoreState {
    artifacts: HashMap<ArtifactId, Arc<Artifact>>,
    /// Insertion order, for inspection.
    order: Vec<ArtifactId>,
}

/// Content store for large agent outputs.
///
/// All operations are synchronous and never block on I/O, so the store can be
/// used freely from async tasks. A poisoned lock is recovered rather than
/// propagated since every write is a single insert.
pub struct ArtifactStore {
    prefix: String,
    state: RwLock<StoreState>,
}

impl ArtifactStore {
    /// Create an empty store with the default id prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ID_PREFIX)
    }

    /// Create an empty store whose ids start with `prefix_`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            state: RwLock::new(StoreState {
                artifacts: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }

    /// Create a shared reference to this store
    pub fn shared(self) -> SharedArtifactStore {
        Arc::new(self)
    }

    /// Store a new immutable artifact and return its fresh id.
    ///
    /// Identical content stored twice yields two artifacts.
    pub fn put(&self, content: impl Into<String>, summary: impl Into<String>) -> ArtifactId {
        let content = content.into();
        let summary = summary.into();

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let id = loop {
            let candidate = self.generate_id();
            if !state.artifacts.contains_key(&candidate) {
                break candidate;
            }
        };

        debug!(
            artifact_id = %id,
            bytes = content.len(),
            summary = %summary,
            "Artifact stored"
        );

        let artifact = Artifact {
            id: id.clone(),
            content,
            summary,
            created_at: Utc::now(),
        };
        state.artifacts.insert(id.clone(), Arc::new(artifact));
        state.order.push(id.clone());
        id
    }

    /// Look up an artifact. A miss is a normal outcome.
    pub fn get(&self, id: &ArtifactId) -> Option<Arc<Artifact>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.artifacts.get(id).cloned()
    }

    /// Look up an artifact, turning a miss into [`ArtifactError::NotFound`].
    pub fn fetch(&self, id: &ArtifactId) -> ArtifactResult<Arc<Artifact>> {
        self.get(id).ok_or_else(|| ArtifactError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.artifacts.contains_key(id)
    }

    /// Number of artifacts stored so far.
    pub fn len(&self) -> usize {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> Vec<ArtifactId> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.order.clone()
    }

    fn generate_id(&self) -> ArtifactId {
        let random = Uuid::new_v4().simple().to_string();
        ArtifactId(format!("{}_{}", self.prefix, &random[..ID_SUFFIX_LEN]))
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("prefix", &self.prefix)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get_round_trip() {
        let store = ArtifactStore::new();
        let id = store.put("Fix the crash in login.", "bug draft");

        let artifact = store.get(&id).unwrap();
        assert_eq!(artifact.id, id);
        assert_eq!(artifact.content, "Fix the crash in login.");
        assert_eq!(artifact.summary, "bug draft");
    }

    #[test]
    fn test_identical_puts_get_distinct_ids() {
        let store = ArtifactStore::new();
        let a = store.put("same", "same");
        let b = store.put("same", "same");
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let store = ArtifactStore::new();
        store.put("content", "summary");
        assert!(store.get(&ArtifactId::new("art_00000000")).is_none());
        assert!(store.get(&ArtifactId::new("")).is_none());
    }

    #[test]
    fn test_fetch_unknown_id_is_not_found() {
        let store = ArtifactStore::new();
        let id = ArtifactId::new("draft_k3x9");
        let err = store.fetch(&id).unwrap_err();
        assert_eq!(err, ArtifactError::NotFound(id));
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_id_format_uses_prefix() {
        let store = ArtifactStore::with_prefix("draft");
        let id = store.put("body", "summary");
        let (prefix, suffix) = id.as_str().split_once('_').unwrap();
        assert_eq!(prefix, "draft");
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_preserve_insertion_order() {
        let store = ArtifactStore::new();
        let first = store.put("one", "1");
        let second = store.put("two", "2");
        let third = store.put("three", "3");
        assert_eq!(store.ids(), vec![first, second, third]);
    }

    #[test]
    fn test_empty_store() {
        let store = ArtifactStore::default();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.ids().is_empty());
    }

    #[test]
    fn test_many_puts_never_reuse_ids() {
        let store = ArtifactStore::new();
        let mut seen = std::collections::HashSet::new();
        for i in 0..500 {
            assert!(seen.insert(store.put(format!("c{i}"), "s")));
        }
        assert_eq!(store.len(), 500);
    }

    #[test]
    fn test_stored_artifact_is_unchanged_by_later_puts() {
        let store = ArtifactStore::new();
        let id = store.put("v1", "first draft");
        let before = store.get(&id).unwrap();
        store.put("v2", "second draft");
        let after = store.get(&id).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_shared_store_across_tasks() {
        let store = ArtifactStore::new().shared();
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.put(format!("content {i}"), format!("summary {i}"))
            }));
        }
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        assert_eq!(store.len(), 8);
        for id in &ids {
            assert!(store.contains(id));
        }
    }
}
