//! Bounded calls to the judgment model

use crate::error::JudgmentError;
use claimcheck_domain::traits::LlmProvider;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Structured-output call to an [`LlmProvider`] with a deadline
///
/// Providers are synchronous, so each call runs on the blocking pool. A call
/// that misses its deadline is abandoned; its result is discarded.
pub struct Judge<L> {
    provider: Arc<L>,
    timeout: Duration,
}

impl<L> Clone for Judge<L> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
        }
    }
}

impl<L> Judge<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: fmt::Display,
{
    /// Create a judge
    pub fn new(provider: Arc<L>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Ask for a response conforming to `schema`
    pub async fn ask(&self, prompt: String, schema: &'static str) -> Result<String, JudgmentError> {
        let provider = Arc::clone(&self.provider);
        let task = tokio::task::spawn_blocking(move || {
            provider
                .generate_structured(&prompt, schema)
                .map_err(|e| JudgmentError::Provider(e.to_string()))
        });

        let response = timeout(self.timeout, task)
            .await
            .map_err(|_| JudgmentError::Timeout(self.timeout))?
            .map_err(|e| JudgmentError::Join(e.to_string()))??;

        debug!(chars = response.len(), "Judgment response received");
        Ok(response)
    }
}
