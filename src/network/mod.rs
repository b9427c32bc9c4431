//! HTTP networking module
//!
//! Provides the HTTP client used for API requests.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::identifying_user_agent;
