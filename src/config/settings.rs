//! Settings structures for wiki-fetch-cache configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub outgoing: OutgoingSettings,
    pub storage: StorageSettings,
    pub autocomplete: AutocompleteSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (WIKI_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(name).ok());
    }

    fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("WIKI_API_URL") {
            self.api.base_url = val;
        }
        if let Some(val) = var("WIKI_USER_AGENT") {
            self.api.user_agent = Some(val);
        }
        if let Some(val) = var("WIKI_CONTACT") {
            self.api.contact = Some(val);
        }
        if let Some(val) = var("WIKI_STORAGE") {
            match val.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => tracing::warn!("Ignoring WIKI_STORAGE: {}", e),
            }
        }
        if let Some(val) = var("WIKI_CACHE_DIR") {
            self.storage.path = Some(PathBuf::from(val));
        }
        if let Some(val) = var("WIKI_TIMEOUT") {
            match val.parse::<f64>() {
                Ok(timeout) if timeout.is_finite() && timeout > 0.0 => {
                    self.outgoing.request_timeout = timeout;
                }
                _ => tracing::warn!("Ignoring WIKI_TIMEOUT: {:?} is not a positive number", val),
            }
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// MediaWiki api.php endpoint
    pub base_url: String,
    /// Value of the `origin` parameter (cross-site marker)
    pub origin: String,
    /// Value of the `formatversion` parameter
    pub format_version: u8,
    /// Full User-Agent override
    pub user_agent: Option<String>,
    /// Contact appended to the generated User-Agent
    pub contact: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikivoyage.org/w/api.php".to_string(),
            origin: "*".to_string(),
            format_version: 2,
            user_agent: None,
            contact: None,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Max idle pooled connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Which store backs the response cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// In-process map, lost on exit
    #[default]
    Memory,
    /// One file per URL under a cache directory
    File,
    /// Size-bounded in-process cache with optional TTL
    Bounded,
}

impl std::str::FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" | "disk" => Ok(Self::File),
            "bounded" => Ok(Self::Bounded),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageKind,
    /// Directory for the file backend (defaults to the user cache dir)
    pub path: Option<PathBuf>,
    /// Entry limit for the bounded backend
    pub max_capacity: u64,
    /// Entry lifetime for the bounded backend (none = no expiry)
    pub ttl_seconds: Option<u64>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageKind::Memory,
            path: None,
            max_capacity: 10_000,
            ttl_seconds: None,
        }
    }
}

impl StorageSettings {
    /// Resolve the directory used by the file backend
    pub fn cache_dir(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("wiki-fetch-cache")
        })
    }
}

/// Which API list backs suggestions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// `list=prefixsearch`, titles starting with the input
    #[default]
    Prefix,
    /// `list=search`, full-text matches with page ids
    FullText,
}

/// Autosuggest settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
    pub search_mode: SearchMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "https://en.wikivoyage.org/w/api.php");
        assert_eq!(settings.api.origin, "*");
        assert_eq!(settings.api.format_version, 2);
        assert_eq!(settings.storage.backend, StorageKind::Memory);
        assert_eq!(settings.autocomplete.search_mode, SearchMode::Prefix);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
api:
  base_url: https://en.wikipedia.org/w/api.php
storage:
  backend: bounded
  max_capacity: 50
autocomplete:
  search_mode: full_text
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.api.base_url, "https://en.wikipedia.org/w/api.php");
        assert_eq!(settings.api.format_version, 2);
        assert_eq!(settings.storage.backend, StorageKind::Bounded);
        assert_eq!(settings.storage.max_capacity, 50);
        assert_eq!(settings.autocomplete.search_mode, SearchMode::FullText);
    }

    #[test]
    fn test_env_override() {
        let mut settings = Settings::default();
        settings.merge_vars(|name| match name {
            "WIKI_API_URL" => Some("http://localhost:8080/w/api.php".to_string()),
            "WIKI_STORAGE" => Some("file".to_string()),
            "WIKI_CACHE_DIR" => Some("/tmp/wiki".to_string()),
            "WIKI_TIMEOUT" => Some("2.5".to_string()),
            _ => None,
        });

        assert_eq!(settings.api.base_url, "http://localhost:8080/w/api.php");
        assert_eq!(settings.storage.backend, StorageKind::File);
        assert_eq!(settings.storage.cache_dir(), PathBuf::from("/tmp/wiki"));
        assert_eq!(settings.outgoing.request_timeout, 2.5);
    }

    #[test]
    fn test_bad_timeout_env_is_ignored() {
        for bad in ["-1", "0", "inf", "NaN", "soon"] {
            let mut settings = Settings::default();
            settings.merge_vars(|name| (name == "WIKI_TIMEOUT").then(|| bad.to_string()));
            assert_eq!(settings.outgoing.request_timeout, crate::DEFAULT_TIMEOUT as f64);
        }
    }

    #[test]
    fn test_disk_alias_selects_file_backend() {
        assert_eq!("disk".parse::<StorageKind>(), Ok(StorageKind::File));
        assert_eq!("FILE".parse::<StorageKind>(), Ok(StorageKind::File));
    }

    #[test]
    fn test_bad_storage_env_is_ignored() {
        let mut settings = Settings::default();
        settings.merge_vars(|name| (name == "WIKI_STORAGE").then(|| "redis".to_string()));
        assert_eq!(settings.storage.backend, StorageKind::Memory);
    }
}
