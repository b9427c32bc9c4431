//! Request URL construction
//!
//! Every request is described by an [`Operation`] and its parameters. The
//! [`QueryBuilder`] prepends the fixed protocol parameters and serializes
//! them onto the API endpoint. The resulting string is both the request
//! target and the cache key, so serialization order must never depend on
//! anything but the descriptor.

use crate::config::ApiSettings;
use crate::error::Result;
use url::Url;

/// Path prefix of article URLs on a MediaWiki site
pub const WIKI_PATH_PREFIX: &str = "/wiki/";

/// Convert a display title to an article path
///
/// Only the first space is replaced.
pub fn wiki_path(title: &str) -> String {
    format!("{}{}", WIKI_PATH_PREFIX, title.replacen(' ', "_", 1))
}

/// Convert an article path back to a display title
///
/// Only the first underscore is replaced.
pub fn wiki_title(path: &str) -> String {
    path.strip_prefix(WIKI_PATH_PREFIX)
        .unwrap_or(path)
        .replacen('_', " ", 1)
}

/// API operations this client knows how to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Title prefix search (`list=prefixsearch`)
    PrefixSearch,
    /// Full-text search (`list=search`)
    FullTextSearch,
    /// Parsed page content (`action=parse`)
    PageParse,
}

impl Operation {
    /// JSON pointer to the response fragment this operation yields
    pub fn extractor(&self) -> &'static str {
        match self {
            Self::PrefixSearch => "/query/prefixsearch",
            Self::FullTextSearch => "/query/search",
            Self::PageParse => "/parse",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrefixSearch => "prefixsearch",
            Self::FullTextSearch => "search",
            Self::PageParse => "parse",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operation with its call-specific parameters, in serialization order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    operation: Operation,
    params: Vec<(String, String)>,
}

impl RequestDescriptor {
    fn new(operation: Operation, params: [(&str, &str); 3]) -> Self {
        Self {
            operation,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Titles starting with `term`
    pub fn prefix_search(term: &str) -> Self {
        Self::new(
            Operation::PrefixSearch,
            [("action", "query"), ("list", "prefixsearch"), ("pssearch", term)],
        )
    }

    /// Pages whose text matches `term`
    pub fn full_text_search(term: &str) -> Self {
        Self::new(
            Operation::FullTextSearch,
            [("action", "query"), ("list", "search"), ("srsearch", term)],
        )
    }

    /// Rendered HTML of the article at `path` (e.g. `/wiki/Tokyo`)
    pub fn page_parse(path: &str) -> Self {
        let title = wiki_title(path);
        Self::new(
            Operation::PageParse,
            [("action", "parse"), ("page", title.as_str()), ("prop", "text")],
        )
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Builds canonical request URLs against a fixed endpoint
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_url: Url,
    common: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a builder; fails only if `base_url` is not a valid URL
    pub fn new(base_url: &str, origin: &str, format_version: u8) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let common = vec![
            ("origin".to_string(), origin.to_string()),
            ("format".to_string(), "json".to_string()),
            ("formatversion".to_string(), format_version.to_string()),
        ];
        Ok(Self { base_url, common })
    }

    pub fn from_settings(settings: &ApiSettings) -> Result<Self> {
        Self::new(&settings.base_url, &settings.origin, settings.format_version)
    }

    /// Serialize a descriptor onto the endpoint
    pub fn build_url(&self, request: &RequestDescriptor) -> String {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .extend_pairs(self.common.iter().chain(request.params.iter()));
        url.to_string()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            base_url: Url::parse(&api.base_url).expect("default API URL is valid"),
            common: vec![
                ("origin".to_string(), api.origin),
                ("format".to_string(), "json".to_string()),
                ("formatversion".to_string(), api.format_version.to_string()),
            ],
        }
    }
}
