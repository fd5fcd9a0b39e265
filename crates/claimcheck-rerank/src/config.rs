//! Configuration for the reranker

use serde::{Deserialize, Serialize};

/// Thresholds and limits for [`crate::Reranker`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    /// Candidates whose raw relevance falls below this are dropped
    pub min_relevance: f64,

    /// Weight of `(credibility - 0.5)` in the final score
    pub credibility_boost_factor: f64,

    /// Most candidates kept from a single domain
    pub max_per_domain: usize,

    /// Default number of candidates returned
    pub top_k: usize,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            min_relevance: 0.3,
            credibility_boost_factor: 0.3,
            max_per_domain: 2,
            top_k: 5,
        }
    }
}

impl RerankConfig {
    /// Aggressive preset: stricter relevance gate, one result per domain
    pub fn aggressive() -> Self {
        Self {
            min_relevance: 1.0,
            max_per_domain: 1,
            top_k: 3,
            ..Self::default()
        }
    }

    /// Lenient preset: accept weaker matches, more results per domain
    pub fn lenient() -> Self {
        Self {
            min_relevance: 0.0,
            credibility_boost_factor: 0.2,
            max_per_domain: 3,
            top_k: 8,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_relevance.is_finite() {
            return Err("min_relevance must be finite".to_string());
        }
        if !(0.0..=1.0).contains(&self.credibility_boost_factor) {
            return Err("credibility_boost_factor must be between 0.0 and 1.0".to_string());
        }
        if self.max_per_domain == 0 {
            return Err("max_per_domain must be at least 1".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
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
