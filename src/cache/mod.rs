//! Response storage for the cached fetcher
//!
//! Stores map a canonical request URL to the JSON text of the response
//! fragment. The fetcher only ever calls [`Storage::get`] and
//! [`Storage::set`]; removal is left to whoever owns the backing store.

mod bounded;
mod file;
mod memory;

pub use bounded::BoundedStore;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{StorageKind, StorageSettings};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Key-value string store addressed by canonical URL
///
/// Implementations must make single-key writes atomic: a concurrent
/// reader sees either the old value or the new one, never a partial value.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &str;

    /// Fetch the stored value for `key`
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

/// Open the backend selected in settings
pub async fn open(settings: &StorageSettings) -> Result<Box<dyn Storage>, StoreError> {
    let store: Box<dyn Storage> = match settings.backend {
        StorageKind::Memory => Box::new(MemoryStore::new()),
        StorageKind::File => Box::new(FileStore::open(settings.cache_dir()).await?),
        StorageKind::Bounded => Box::new(BoundedStore::new(
            settings.max_capacity,
            settings.ttl_seconds.map(Duration::from_secs),
        )),
    };
    tracing::debug!("Opened {} storage", store.name());
    Ok(store)
}
