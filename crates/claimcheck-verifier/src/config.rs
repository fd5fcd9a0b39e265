//! Configuration for the verification controller

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retrieval sizes, sufficiency gates and time budgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Nearest neighbours requested from the evidence store
    pub retrieval_top_k: usize,

    /// Candidates kept by each rerank
    pub rerank_top_k: usize,

    /// Sufficiency gate: fewest knowledge-base candidates
    pub min_evidence_count: usize,

    /// Sufficiency gate: lowest mean relevance
    pub min_mean_relevance: f64,

    /// Broad search runs when fewer relevant candidates than this remain
    /// after the trusted and fact-checker stages
    pub broad_search_threshold: usize,

    /// Deadline for one judgment call (seconds)
    pub judgment_timeout_secs: u64,

    /// Deadline for a whole verification (seconds)
    pub verification_timeout_secs: u64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            retrieval_top_k: 20,
            rerank_top_k: 5,
            min_evidence_count: 2,
            min_mean_relevance: 1.0,
            broad_search_threshold: 2,
            judgment_timeout_secs: 30,
            verification_timeout_secs: 90,
        }
    }
}

impl VerifierConfig {
    /// Aggressive preset: trust the knowledge base sooner, tighter deadlines
    pub fn aggressive() -> Self {
        Self {
            retrieval_top_k: 10,
            min_mean_relevance: 0.5,
            judgment_timeout_secs: 15,
            verification_timeout_secs: 45,
            ..Self::default()
        }
    }

    /// Lenient preset: demand more evidence, generous deadlines
    pub fn lenient() -> Self {
        Self {
            retrieval_top_k: 40,
            rerank_top_k: 8,
            min_evidence_count: 3,
            min_mean_relevance: 1.5,
            broad_search_threshold: 3,
            judgment_timeout_secs: 60,
            verification_timeout_secs: 180,
        }
    }

    /// Get the judgment timeout as a Duration
    pub fn judgment_timeout(&self) -> Duration {
        Duration::from_secs(self.judgment_timeout_secs)
    }

    /// Get the verification timeout as a Duration
    pub fn verification_timeout(&self) -> Duration {
        Duration::from_secs(self.verification_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retrieval_top_k == 0 {
            return Err("retrieval_top_k must be at least 1".to_string());
        }
        if self.rerank_top_k == 0 {
            return Err("rerank_top_k must be at least 1".to_string());
        }
        if self.rerank_top_k > self.retrieval_top_k {
            return Err("rerank_top_k cannot exceed retrieval_top_k".to_string());
        }
        if !self.min_mean_relevance.is_finite() {
            return Err("min_mean_relevance must be finite".to_string());
        }
        if self.judgment_timeout_secs == 0 {
            return Err("judgment_timeout_secs must be greater than 0".to_string());
        }
        if self.verification_timeout_secs == 0 {
            return Err("verification_timeout_secs must be greater than 0".to_string());
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
