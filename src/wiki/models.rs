//! Typed records decoded from API responses

use serde::{Deserialize, Serialize};

/// A search hit offered as a suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    /// Present in full-text and prefix search results, absent in older caches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pageid: Option<u64>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pageid: None,
        }
    }

    pub fn with_pageid(mut self, pageid: u64) -> Self {
        self.pageid = Some(pageid);
        self
    }

    /// Article path for this suggestion
    pub fn path(&self) -> String {
        crate::query::wiki_path(&self.title)
    }
}

/// A parsed article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    /// Rendered HTML body
    pub text: String,
}
