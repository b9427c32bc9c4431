//! Error types shared by the query builder, fetcher and stores

use crate::cache::StoreError;
use thiserror::Error;

/// Errors returned while resolving a wiki request
#[derive(Debug, Error)]
pub enum WikiError {
    /// Connection, timeout or transport level failure
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Response body or cached value is not the expected JSON
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but lacks the expected fragment
    #[error("response has no field at {0}")]
    MissingField(String),

    /// MediaWiki reported an error object instead of a result
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A setting has a value the client cannot use
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl WikiError {
    /// Whether the failure happened before or at the network boundary
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus(_))
    }
}

pub type Result<T> = std::result::Result<T, WikiError>;
