//! Size-bounded in-process store

use super::{Storage, StoreError};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// Moka-backed store with a capacity limit and optional TTL
pub struct BoundedStore {
    cache: Cache<String, String>,
}

impl BoundedStore {
    pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().max_capacity(max_capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
        }
    }

    /// Approximate entry count
    pub fn size(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Flush pending evictions so `size` is exact
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for BoundedStore {
    fn default() -> Self {
        Self::new(10_000, None)
    }
}

#[async_trait]
impl Storage for BoundedStore {
    fn name(&self) -> &str {
        "bounded"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_store() {
        let store = BoundedStore::new(100, None);
        store.set("test", "[1,2,3]".to_string()).await.unwrap();

        let result = store.get("test").await.unwrap();
        assert_eq!(result.as_deref(), Some("[1,2,3]"));
    }

    #[tokio::test]
    async fn test_capacity_is_enforced() {
        let store = BoundedStore::new(5, None);
        for i in 0..50 {
            store.set(&format!("key-{}", i), i.to_string()).await.unwrap();
        }
        store.sync().await;
        assert!(store.size() <= 5);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let store = BoundedStore::new(10, Some(Duration::from_millis(50)));
        store.set("k", "v".to_string()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(store.get("k").await.unwrap().is_none());
    }
}
