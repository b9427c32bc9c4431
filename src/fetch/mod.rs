//! Cached fetching of API responses
//!
//! [`CachedFetcher::resolve`] answers a canonical URL from the injected
//! store when it can and from the network otherwise. Only the response
//! fragment named by the extractor is stored, as JSON text, under the
//! exact URL that produced it.

use crate::cache::Storage;
use crate::error::{Result, WikiError};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves URLs through a store, falling back to the network on a miss
pub struct CachedFetcher<S> {
    client: HttpClient,
    store: S,
    metrics: Arc<Metrics>,
}

impl<S: Storage> CachedFetcher<S> {
    pub fn new(client: HttpClient, store: S) -> Self {
        Self {
            client,
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Share an existing metrics instance
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Resolve `url` and decode the fragment at `extractor` into `T`
    ///
    /// `extractor` is a JSON pointer such as `/query/prefixsearch`.
    pub async fn resolve<T: DeserializeOwned>(&self, url: &str, extractor: &str) -> Result<T> {
        self.metrics.record_lookup();
        let result = self.lookup(url, extractor).await;
        if let Err(ref e) = result {
            self.metrics.record_error();
            warn!("Failed to resolve {}: {}", url, e);
        }
        result
    }

    /// Resolve `url` without decoding into a concrete type
    pub async fn resolve_value(&self, url: &str, extractor: &str) -> Result<Value> {
        self.resolve(url, extractor).await
    }

    async fn lookup<T: DeserializeOwned>(&self, url: &str, extractor: &str) -> Result<T> {
        if let Some(cached) = self.store.get(url).await? {
            self.metrics.record_cache_hit();
            debug!("Cache hit ({}) for {}", self.store.name(), url);
            return Ok(serde_json::from_str(&cached)?);
        }

        debug!("Cache miss, fetching {}", url);
        self.metrics.record_network_request();
        let body = self.client.get_json(url).await?;
        let fragment = extract(body, extractor)?;

        // Only fragments that decode into `T` are stored
        let typed = T::deserialize(&fragment)?;
        let text = serde_json::to_string(&fragment)?;

        self.store.set(url, text).await?;
        self.metrics.record_store_write();
        Ok(typed)
    }
}

/// Pull the fragment at `pointer` out of an API response
///
/// A missing fragment is reported as the API's own error when the body
/// carries one.
pub fn extract(mut body: Value, pointer: &str) -> Result<Value> {
    if let Some(fragment) = body.pointer_mut(pointer) {
        return Ok(fragment.take());
    }

    if let Some(error) = body.get("error") {
        let field = |name: &str| {
            error
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        return Err(WikiError::Api {
            code: field("code"),
            info: field("info"),
        });
    }

    Err(WikiError::MissingField(pointer.to_string()))
}
