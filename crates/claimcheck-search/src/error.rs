//! Error types for web search

use std::time::Duration;
use thiserror::Error;

/// Errors raised by search backends and the evidence provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The backend asked us to slow down (HTTP 429 or equivalent)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Transport or HTTP failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Backend call exceeded its deadline
    #[error("Search timed out after {0:?}")]
    Timeout(Duration),

    /// Backend is not configured (e.g. missing API key)
    #[error("Search backend not configured: {0}")]
    NotConfigured(String),
}

impl SearchError {
    /// Whether the call may succeed if retried after a pause
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SearchError::RateLimited(_))
    }
}
