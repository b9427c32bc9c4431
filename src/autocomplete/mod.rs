//! Headless autosuggest session
//!
//! Models the state behind a search-as-you-type input: the current text,
//! the visible suggestions and a count of the requests issued. Every fetch
//! request is counted, whether or not it was answered from the store.

use crate::cache::Storage;
use crate::config::{AutocompleteSettings, SearchMode};
use crate::error::Result;
use crate::wiki::{Suggestion, WikiClient};
use std::sync::Arc;
use tracing::warn;

/// Suggestion state for one input box
pub struct Autosuggest<S> {
    client: Arc<WikiClient<S>>,
    mode: SearchMode,
    value: String,
    suggestions: Vec<Suggestion>,
    api_request_count: u64,
}

impl<S: Storage> Autosuggest<S> {
    pub fn new(client: Arc<WikiClient<S>>, settings: &AutocompleteSettings) -> Self {
        Self {
            client,
            mode: settings.search_mode,
            value: String::new(),
            suggestions: Vec::new(),
            api_request_count: 0,
        }
    }

    /// The input text changed
    pub fn on_change(&mut self, new_value: &str) {
        self.value = new_value.to_string();
    }

    /// Fetch suggestions for `value` and make them current
    ///
    /// On failure the previous suggestions stay in place.
    pub async fn on_fetch_requested(&mut self, value: &str) -> Result<&[Suggestion]> {
        self.api_request_count += 1;

        let result = match self.mode {
            SearchMode::Prefix => self.client.search(value).await,
            SearchMode::FullText => self.client.full_text_search(value).await,
        };

        match result {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                Ok(&self.suggestions)
            }
            Err(e) => {
                warn!("Suggestion request for {:?} failed: {}", value, e);
                Err(e)
            }
        }
    }

    /// The input asked for the list to be emptied
    pub fn on_clear_requested(&mut self) {
        self.suggestions.clear();
    }

    /// Text written back into the input when a suggestion is picked
    pub fn suggestion_value(suggestion: &Suggestion) -> &str {
        &suggestion.title
    }

    /// Change the input and fetch for it in one step
    pub async fn input(&mut self, new_value: &str) -> Result<&[Suggestion]> {
        self.on_change(new_value);
        if new_value.trim().is_empty() {
            self.on_clear_requested();
            return Ok(&self.suggestions);
        }
        self.on_fetch_requested(new_value).await
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn api_request_count(&self) -> u64 {
        self.api_request_count
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }
}
