//! In-memory object store using moka.
//!
//! Stands in for the bucket when no remote storage is configured, and backs
//! most tests. Contents are lost when the process exits, so artifacts stored
//! here only survive through the local filesystem mirror.
//!
//! Entries are weighted by their byte size and evicted LRU once the total
//! exceeds the configured capacity.

use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::cache::traits::{ObjectStore, StoreError};
use crate::BoxFuture;

/// In-memory object store.
pub struct MemoryObjectStore {
    objects: MokaCache<String, Vec<u8>>,
    max_size_bytes: u64,
}

impl MemoryObjectStore {
    /// Create a new memory object store.
    ///
    /// # Arguments
    ///
    /// * `max_size_bytes` - Maximum total size in bytes
    /// * `ttl` - Optional time-to-live for objects
    pub fn new(max_size_bytes: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaCache::builder()
            // moka weights are u32, cap very large objects
            .weigher(|_key: &String, value: &Vec<u8>| -> u32 {
                value.len().min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes);

        if let Some(ttl_duration) = ttl {
            builder = builder.time_to_live(ttl_duration);
        }

        Self {
            objects: builder.build(),
            max_size_bytes,
        }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Number of stored objects after pending maintenance has run.
    pub async fn object_count(&self) -> u64 {
        self.objects.run_pending_tasks().await;
        self.objects.entry_count()
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        // 256 MB holds every scope of a few hundred cities
        Self::new(256 * 1024 * 1024, None)
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get_object(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.objects.get(&key).await) })
    }

    fn put_object(&self, key: &str, body: Vec<u8>) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.objects.insert(key, body).await;
            Ok(())
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryObjectStore::new(1_000_000, None);

        store.put_object("a/b.json", b"{}".to_vec()).await.unwrap();

        let value = store.get_object("a/b.json").await.unwrap();
        assert_eq!(value, Some(b"{}".to_vec()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryObjectStore::default();
        assert!(store.get_object("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_existing() {
        let store = MemoryObjectStore::new(1_000_000, None);

        store.put_object("key", vec![1, 2, 3]).await.unwrap();
        store.put_object("key", vec![4, 5, 6, 7]).await.unwrap();

        assert_eq!(store.get_object("key").await.unwrap(), Some(vec![4, 5, 6, 7]));
        assert_eq!(store.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let store = MemoryObjectStore::new(1_000_000, Some(Duration::from_millis(50)));

        store.put_object("key", vec![1]).await.unwrap();
        assert!(store.get_object("key").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(store.get_object("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let store = Arc::new(MemoryObjectStore::new(10_000_000, None));
        let mut handles = Vec::new();

        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let key = format!("city{}.json", i);
                let data = vec![i as u8; 100];

                store.put_object(&key, data.clone()).await.unwrap();
                assert_eq!(store.get_object(&key).await.unwrap(), Some(data));
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.object_count().await, 50);
    }
}
