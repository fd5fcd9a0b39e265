//! Configuration for web evidence search

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result limits, retry policy and pacing for [`crate::WebEvidenceProvider`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Most results from the trusted-news stage
    pub trusted_max_results: usize,

    /// Most results from the fact-checker stage
    pub fact_check_max_results: usize,

    /// Most results from the unrestricted stage
    pub broad_max_results: usize,

    /// Attempts per stage, including the first
    pub max_attempts: u32,

    /// First backoff after a rate limit (milliseconds); doubles per retry
    pub base_backoff_ms: u64,

    /// Minimum gap between consecutive backend calls (milliseconds)
    pub cooldown_ms: u64,

    /// Deadline for one backend call (seconds)
    pub request_timeout_secs: u64,

    /// Serper API key; usually supplied through `SERPER_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trusted_max_results: 8,
            fact_check_max_results: 5,
            broad_max_results: 8,
            max_attempts: 3,
            base_backoff_ms: 1000,
            cooldown_ms: 1000,
            request_timeout_secs: 15,
            api_key: None,
        }
    }
}

impl SearchConfig {
    /// Aggressive preset: fewer results, at most one retry
    pub fn aggressive() -> Self {
        Self {
            trusted_max_results: 5,
            fact_check_max_results: 3,
            broad_max_results: 5,
            max_attempts: 2,
            request_timeout_secs: 8,
            ..Self::default()
        }
    }

    /// Lenient preset: more results, patient retries
    pub fn lenient() -> Self {
        Self {
            trusted_max_results: 10,
            fact_check_max_results: 8,
            broad_max_results: 10,
            max_attempts: 4,
            base_backoff_ms: 2000,
            cooldown_ms: 1500,
            request_timeout_secs: 30,
            api_key: None,
        }
    }

    /// Backoff before the retry following attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.base_backoff_ms.saturating_mul(factor))
    }

    /// Get the cooldown as a Duration
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Get the per-call timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.trusted_max_results == 0
            || self.fact_check_max_results == 0
            || self.broad_max_results == 0
        {
            return Err("max_results values must be at least 1".to_string());
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
