//! HTTP client for the wiki API

use super::user_agent::{accept_json, identifying_user_agent};
use crate::config::{ApiSettings, OutgoingSettings};
use crate::error::{Result, WikiError};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper sending a fixed identifying User-Agent
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default(), identifying_user_agent(None))
    }

    /// Create a client from settings with the given User-Agent
    pub fn with_settings(settings: &OutgoingSettings, user_agent: String) -> Result<Self> {
        let timeout = request_timeout(settings.request_timeout)?;
        let mut builder = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent,
            extra_headers: settings.extra_headers.clone(),
        })
    }

    /// Create a client from the API and outgoing sections of the settings
    pub fn from_settings(api: &ApiSettings, outgoing: &OutgoingSettings) -> Result<Self> {
        let user_agent = api
            .user_agent
            .clone()
            .unwrap_or_else(|| identifying_user_agent(api.contact.as_deref()));
        Self::with_settings(outgoing, user_agent)
    }

    /// GET a URL and parse the body as JSON
    ///
    /// Non-2xx statuses fail with [`WikiError::HttpStatus`] before the body
    /// is read.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let mut req_builder = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }

        let response = req_builder.send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status.as_u16());

        if !status.is_success() {
            return Err(WikiError::HttpStatus(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Validate a timeout given in seconds
fn request_timeout(seconds: f64) -> Result<Duration> {
    if seconds <= 0.0 {
        return Err(WikiError::Config(format!(
            "request_timeout must be positive, got {}",
            seconds
        )));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| WikiError::Config(format!("request_timeout {}: {}", seconds, e)))
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
