//! Serper.dev Google search backend

use crate::{SearchError, SearchHit, SearchRequest, WebSearchBackend};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default Serper search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Debug, Deserialize)]
struct SerperItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperItem>,
}

/// HTTP JSON client for the Serper search API
pub struct SerperBackend {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl SerperBackend {
    /// Create a backend with the given API key and per-request timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        // Builder only fails on TLS backend misconfiguration; fall back to defaults
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout,
        }
    }

    /// Point the backend at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl WebSearchBackend for SerperBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::NotConfigured("missing Serper API key".to_string()));
        }

        let query = request.query_string();
        debug!(%query, max_results = request.max_results, "Serper search");

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": request.max_results }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(self.timeout)
                } else {
                    SearchError::Network(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Network(format!("HTTP {}: {}", status, body)));
        }

        let parsed: SerperResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(parsed
            .organic
            .into_iter()
            .take(request.max_results)
            .map(|item| SearchHit::new(item.title, item.snippet, item.link))
            .collect())
    }

    fn name(&self) -> &str {
        "serper"
    }
}
