//! Two-tier artifact store.
//!
//! Wraps a durable [`ObjectStore`] and an optional [`LocalMirror`] behind a
//! JSON-level interface keyed by [`CacheKey`].
//!
//! # Read path
//!
//! Object store first, local mirror second. Any failure, whether the object
//! is missing, the store is unreachable, or the document does not parse, is
//! reported as a miss so that the caller recomputes.
//!
//! # Write path
//!
//! Local mirror first (best-effort, failures only logged), then the object
//! store. A failed object store write is returned as an error: the artifact
//! is not persisted.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::key::CacheKey;
use super::local::LocalMirror;
use super::traits::{ObjectStore, StoreError};

/// Whether the cache is consulted at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read before computing, write after.
    #[default]
    Enabled,
    /// Never read or write; every request computes.
    Bypass,
}

/// Errors returned by cache writes.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The artifact could not be serialized.
    #[error("Failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The durable store rejected the write.
    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: StoreError,
    },
}

/// Two-tier JSON artifact store.
#[derive(Clone)]
pub struct CacheStore {
    durable: Arc<dyn ObjectStore>,
    local: Option<LocalMirror>,
    mode: CacheMode,
}

impl CacheStore {
    /// Create a store backed by `durable` only.
    pub fn new(durable: Arc<dyn ObjectStore>) -> Self {
        Self {
            durable,
            local: None,
            mode: CacheMode::Enabled,
        }
    }

    /// Add a local filesystem mirror.
    pub fn with_local_mirror(mut self, mirror: LocalMirror) -> Self {
        self.local = Some(mirror);
        self
    }

    /// Set the cache mode.
    pub fn with_mode(mut self, mode: CacheMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> CacheMode {
        self.mode
    }

    pub fn local_mirror(&self) -> Option<&LocalMirror> {
        self.local.as_ref()
    }

    /// Read the artifact for `key`.
    ///
    /// # Returns
    ///
    /// `Some(artifact)` on a hit, `None` on a miss or any failure.
    pub async fn read(&self, key: &CacheKey) -> Option<Value> {
        if self.mode == CacheMode::Bypass {
            return None;
        }

        let path = key.path();
        match self.durable.get_object(&path).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(artifact) => {
                    debug!(path = %path, store = self.durable.name(), "Cache hit");
                    return Some(artifact);
                }
                Err(e) => warn!(path = %path, error = %e, "Corrupt cached artifact, treating as miss"),
            },
            Ok(None) => debug!(path = %path, store = self.durable.name(), "Not in object store"),
            Err(e) => warn!(path = %path, error = %e, "Object store read failed"),
        }

        let local = self.local.as_ref()?;
        let bytes = local.read(&path).await?;
        match serde_json::from_slice(&bytes) {
            Ok(artifact) => {
                debug!(path = %path, "Cache hit in local mirror");
                Some(artifact)
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Corrupt local artifact, treating as miss");
                None
            }
        }
    }

    /// Persist `artifact` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Persist` if the durable write fails. Local mirror
    /// failures are logged and ignored.
    pub async fn write(&self, key: &CacheKey, artifact: &Value) -> Result<(), CacheError> {
        if self.mode == CacheMode::Bypass {
            debug!(path = %key, "Cache bypassed, not writing");
            return Ok(());
        }

        let path = key.path();
        let body = serde_json::to_vec(artifact)?;

        if let Some(local) = &self.local {
            if let Err(e) = local.write(&path, body.clone()).await {
                warn!(path = %path, error = %e, "Failed to write local cache file");
            }
        }

        self.durable
            .put_object(&path, body)
            .await
            .map_err(|source| CacheError::Persist {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path, "Artifact written");
        Ok(())
    }

    /// Check that the durable store answers by reading `probe_key`.
    ///
    /// A missing probe object still proves the store is reachable. Failures
    /// are logged, never fatal.
    pub async fn probe(&self, probe_key: &str) -> bool {
        match self.durable.get_object(probe_key).await {
            Ok(found) => {
                info!(
                    store = self.durable.name(),
                    probe_key,
                    found = found.is_some(),
                    "Object storage works"
                );
                true
            }
            Err(e) => {
                warn!(store = self.durable.name(), probe_key, error = %e, "Object storage probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::cache::key::VersionDirectory;
    use crate::cache::providers::MemoryObjectStore;
    use crate::scope::Dimension;
    use crate::BoxFuture;

    /// Store whose every call fails.
    struct BrokenStore;

    impl ObjectStore for BrokenStore {
        fn get_object(&self, _key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
            Box::pin(async { Err(StoreError::Http("unreachable".to_string())) })
        }

        fn put_object(&self, key: &str, _body: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
            let key = key.to_string();
            Box::pin(async move { Err(StoreError::Status { status: 503, key }) })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn key(scope: &str) -> CacheKey {
        CacheKey::new(
            VersionDirectory::new(10, 2026, "test"),
            "Nantes",
            scope,
            Dimension::Cycling,
        )
    }

    #[tokio::test]
    async fn test_write_then_read_roundtrip() {
        let store = CacheStore::new(Arc::new(MemoryObjectStore::default()));
        let artifact = json!({"score": 0.7, "segments": [1, 2, 3]});

        store.write(&key("cycling-score"), &artifact).await.unwrap();

        assert_eq!(store.read(&key("cycling-score")).await, Some(artifact));
    }

    #[tokio::test]
    async fn test_read_miss() {
        let store = CacheStore::new(Arc::new(MemoryObjectStore::default()));
        assert!(store.read(&key("missing")).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_artifact_is_a_miss() {
        let durable = Arc::new(MemoryObjectStore::default());
        durable
            .put_object(&key("meta").path(), b"{not json".to_vec())
            .await
            .unwrap();
        let store = CacheStore::new(durable);

        assert!(store.read(&key("meta")).await.is_none());
    }

    #[tokio::test]
    async fn test_write_mirrors_locally() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(Arc::new(MemoryObjectStore::default()))
            .with_local_mirror(LocalMirror::new(temp.path()));

        store.write(&key("meta"), &json!({"a": 1})).await.unwrap();

        let local = std::fs::read_to_string(temp.path().join(key("meta").path())).unwrap();
        assert_eq!(local, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_dotted_city_does_not_alias_another_city() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(Arc::new(MemoryObjectStore::default()))
            .with_local_mirror(LocalMirror::new(temp.path()));
        let version = VersionDirectory::new(10, 2026, "test");
        let nantes = CacheKey::new(version.clone(), "Nantes", "full", Dimension::Cycling);
        let dotted = CacheKey::new(version, "../Nantes", "full", Dimension::Cycling);

        store.write(&nantes, &json!({"city": "Nantes"})).await.unwrap();
        store.write(&dotted, &json!({"city": "../Nantes"})).await.unwrap();

        assert_eq!(store.read(&nantes).await, Some(json!({"city": "Nantes"})));
        assert_eq!(store.read(&dotted).await, Some(json!({"city": "../Nantes"})));
        assert!(temp.path().join(dotted.path()).starts_with(temp.path()));
        assert!(temp.path().join(dotted.path()).is_file());
    }

    #[tokio::test]
    async fn test_durable_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let store =
            CacheStore::new(Arc::new(BrokenStore)).with_local_mirror(LocalMirror::new(temp.path()));

        let err = store.write(&key("meta"), &json!(1)).await.unwrap_err();
        assert!(matches!(err, CacheError::Persist { .. }));

        // The local mirror was still written before the durable tier failed.
        assert!(temp.path().join(key("meta").path()).exists());
    }

    #[tokio::test]
    async fn test_local_failure_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        // A file where the mirror root should be makes every local write fail.
        let blocked = temp.path().join("blocked");
        std::fs::write(&blocked, b"").unwrap();
        let store = CacheStore::new(Arc::new(MemoryObjectStore::default()))
            .with_local_mirror(LocalMirror::new(&blocked));

        store.write(&key("meta"), &json!({"ok": true})).await.unwrap();
        assert_eq!(store.read(&key("meta")).await, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_read_falls_back_to_local_mirror() {
        let temp = TempDir::new().unwrap();
        let mirror = LocalMirror::new(temp.path());
        mirror
            .write(&key("meta").path(), br#"{"from":"disk"}"#.to_vec())
            .await
            .unwrap();
        let store = CacheStore::new(Arc::new(BrokenStore)).with_local_mirror(mirror);

        assert_eq!(store.read(&key("meta")).await, Some(json!({"from": "disk"})));
    }

    #[tokio::test]
    async fn test_bypass_never_reads_or_writes() {
        let durable = Arc::new(MemoryObjectStore::default());
        let store = CacheStore::new(durable.clone()).with_mode(CacheMode::Bypass);

        store.write(&key("meta"), &json!(1)).await.unwrap();
        assert!(durable.get_object(&key("meta").path()).await.unwrap().is_none());

        durable
            .put_object(&key("meta").path(), b"1".to_vec())
            .await
            .unwrap();
        assert!(store.read(&key("meta")).await.is_none());
    }

    #[tokio::test]
    async fn test_probe() {
        let healthy = CacheStore::new(Arc::new(MemoryObjectStore::default()));
        assert!(healthy.probe("healthcheck.txt").await);

        let broken = CacheStore::new(Arc::new(BrokenStore));
        assert!(!broken.probe("healthcheck.txt").await);
    }
}
