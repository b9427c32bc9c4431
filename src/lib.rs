//! wiki-fetch-cache: a caching client for the MediaWiki search and page API
//!
//! Requests are described by an operation and its parameters, turned into a
//! canonical URL, and resolved through an injected key-value store. The URL
//! is the cache key; a stored response fragment is served without touching
//! the network.

pub mod autocomplete;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod network;
pub mod query;
pub mod wiki;

pub use autocomplete::Autosuggest;
pub use cache::{Storage, StoreError};
pub use config::Settings;
pub use error::WikiError;
pub use fetch::CachedFetcher;
pub use query::{wiki_path, wiki_title, Operation, QueryBuilder, RequestDescriptor};
pub use wiki::{Page, Suggestion, WikiClient};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for API requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;
