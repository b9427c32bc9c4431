//! Typed wiki operations
//!
//! [`WikiClient`] turns a search string or article path into a canonical
//! URL and resolves it through a [`CachedFetcher`].

mod models;

pub use models::{Page, Suggestion};

use crate::cache::Storage;
use crate::config::Settings;
use crate::error::Result;
use crate::fetch::CachedFetcher;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::query::{QueryBuilder, RequestDescriptor};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Search and page client over an injected store
pub struct WikiClient<S> {
    builder: QueryBuilder,
    fetcher: CachedFetcher<S>,
}

impl<S: Storage> WikiClient<S> {
    pub fn new(builder: QueryBuilder, fetcher: CachedFetcher<S>) -> Self {
        Self { builder, fetcher }
    }

    /// Build a client for the configured API over `store`
    pub fn from_settings(settings: &Settings, store: S) -> Result<Self> {
        let builder = QueryBuilder::from_settings(&settings.api)?;
        let client = HttpClient::from_settings(&settings.api, &settings.outgoing)?;
        Ok(Self::new(builder, CachedFetcher::new(client, store)))
    }

    /// Titles starting with `term`
    pub async fn search(&self, term: &str) -> Result<Vec<Suggestion>> {
        self.resolve(&RequestDescriptor::prefix_search(term)).await
    }

    /// Pages whose text matches `term`
    pub async fn full_text_search(&self, term: &str) -> Result<Vec<Suggestion>> {
        self.resolve(&RequestDescriptor::full_text_search(term)).await
    }

    /// The article at `path`, e.g. `/wiki/Tokyo`
    pub async fn page(&self, path: &str) -> Result<Page> {
        self.resolve(&RequestDescriptor::page_parse(path)).await
    }

    /// Resolve any descriptor to its response fragment
    pub async fn resolve<T: DeserializeOwned>(&self, request: &RequestDescriptor) -> Result<T> {
        let url = self.builder.build_url(request);
        debug!("Resolving {} request", request.operation());
        self.fetcher
            .resolve(&url, request.operation().extractor())
            .await
    }

    /// Canonical URL of a prefix search
    pub fn search_url(&self, term: &str) -> String {
        self.builder.build_url(&RequestDescriptor::prefix_search(term))
    }

    /// Canonical URL of a page request
    pub fn page_url(&self, path: &str) -> String {
        self.builder.build_url(&RequestDescriptor::page_parse(path))
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    pub fn fetcher(&self) -> &CachedFetcher<S> {
        &self.fetcher
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        self.fetcher.metrics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::WikiError;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WikiClient<Arc<MemoryStore>> {
        let mut settings = Settings::default();
        settings.api.base_url = format!("{}/w/api.php", server.uri());
        WikiClient::from_settings(&settings, Arc::new(MemoryStore::new())).unwrap()
    }

    #[tokio::test]
    async fn test_search_then_cached_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("origin", "*"))
            .and(query_param("format", "json"))
            .and(query_param("formatversion", "2"))
            .and(query_param("action", "query"))
            .and(query_param("list", "prefixsearch"))
            .and(query_param("pssearch", "Tokyo"))
            .and(header_exists("User-Agent"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"query": {"prefixsearch": [{"title": "Tokyo"}]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        let first = client.search("Tokyo").await.unwrap();
        assert_eq!(first, vec![Suggestion::new("Tokyo")]);

        let cached = client
            .fetcher()
            .store()
            .get(&client.search_url("Tokyo"))
            .await
            .unwrap();
        assert_eq!(cached.as_deref(), Some(r#"[{"title":"Tokyo"}]"#));

        // Mock expects a single request; this one must come from the store
        let second = client.search("Tokyo").await.unwrap();
        assert_eq!(second, vec![Suggestion::new("Tokyo")]);
        assert_eq!(client.metrics().network_requests(), 1);
    }

    #[tokio::test]
    async fn test_cache_survives_server_reset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"query": {"prefixsearch": [{"title": "Tokyo"}]}})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.search("Tokyo").await.unwrap();

        server.reset().await;
        let again = client.search("Tokyo").await.unwrap();
        assert_eq!(again, vec![Suggestion::new("Tokyo")]);
    }

    #[tokio::test]
    async fn test_full_text_search_has_pageids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("list", "search"))
            .and(query_param("srsearch", "Kyoto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "batchcomplete": true,
                "query": {
                    "searchinfo": {"totalhits": 2},
                    "search": [
                        {"ns": 0, "title": "Kyoto", "pageid": 5, "snippet": "…"},
                        {"ns": 0, "title": "Kyoto Prefecture", "pageid": 6, "snippet": "…"}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let results = client.full_text_search("Kyoto").await.unwrap();
        assert_eq!(
            results,
            vec![
                Suggestion::new("Kyoto").with_pageid(5),
                Suggestion::new("Kyoto Prefecture").with_pageid(6),
            ]
        );
    }

    #[tokio::test]
    async fn test_page_uses_title_from_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "parse"))
            .and(query_param("page", "New York"))
            .and(query_param("prop", "text"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "parse": {"title": "New York", "pageid": 7, "text": "<p>Big apple</p>"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let page = client.page("/wiki/New_York").await.unwrap();
        assert_eq!(
            page,
            Page {
                title: "New York".to_string(),
                text: "<p>Big apple</p>".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_page_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"code": "missingtitle", "info": "The page you specified doesn't exist."}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.page("/wiki/Nowhere").await.unwrap_err();
        assert!(matches!(err, WikiError::Api { ref code, .. } if code == "missingtitle"));
        assert!(client
            .fetcher()
            .store()
            .get(&client.page_url("/wiki/Nowhere"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_shared_store_between_clients() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"query": {"prefixsearch": [{"title": "Oslo"}]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let mut settings = Settings::default();
        settings.api.base_url = format!("{}/w/api.php", server.uri());

        let a = WikiClient::from_settings(&settings, store.clone()).unwrap();
        let b = WikiClient::from_settings(&settings, store.clone()).unwrap();

        a.search("Oslo").await.unwrap();
        assert_eq!(b.search("Oslo").await.unwrap(), vec![Suggestion::new("Oslo")]);
        assert_eq!(store.len(), 1);
    }
}
