//! # In-memory key-value store
//!
//! [`InMemoryKvStore`] implements [`KeyValueStore`] over a `HashMap`. Data is lost
//! when the process exits; used in tests and with `MEMORY_STORE_TYPE=memory`.
//!
//! ## Thread Safety
//!
//! Clones share the same map through `Arc<RwLock<>>`.

use async_trait::async_trait;
use memory_core::KeyValueStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct InMemoryKvStore {
    records: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        debug!(key = %key, bytes = value.len(), "kv set");
        self.records.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.records.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1".to_string()).await.unwrap();
        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let store = InMemoryKvStore::new();
        store.remove("absent").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_clones_share_records() {
        tokio_test::block_on(async {
            let store = InMemoryKvStore::new();
            let other = store.clone();
            store.set("shared", "1".to_string()).await.unwrap();
            assert_eq!(other.get("shared").await.unwrap().as_deref(), Some("1"));
        });
    }
}
