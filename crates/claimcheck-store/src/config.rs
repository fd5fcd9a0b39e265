//! Configuration for the evidence store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for [`crate::SqliteEvidenceStore`]
///
/// # Examples
///
/// ```
/// use claimcheck_store::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.access_boost, 0.02);
/// assert!(config.max_access_boost.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; `None` lets the caller pick a default location
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Embedding dimension expected by the vector index
    pub embedding_dimension: usize,

    /// Default number of nearest neighbours returned by a query
    pub top_k: usize,

    /// Score added per recorded access
    pub access_boost: f64,

    /// Upper bound on the total access boost; `None` means unbounded
    #[serde(default)]
    pub max_access_boost: Option<f64>,

    /// HNSW search candidate list size
    pub ef_search: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            embedding_dimension: 384,
            top_k: 20,
            access_boost: 0.02,
            max_access_boost: None,
            ef_search: 64,
        }
    }
}

impl StoreConfig {
    /// Aggressive preset: fewer candidates, bounded popularity boost
    pub fn aggressive() -> Self {
        Self {
            top_k: 10,
            ef_search: 32,
            access_boost: 0.02,
            max_access_boost: Some(0.2),
            ..Self::default()
        }
    }

    /// Lenient preset: wider candidate pool, gentler unbounded boost
    pub fn lenient() -> Self {
        Self {
            top_k: 40,
            ef_search: 128,
            access_boost: 0.01,
            max_access_boost: None,
            ..Self::default()
        }
    }

    /// Boost for a document with the given access count
    pub fn boost_for(&self, access_count: u64) -> f64 {
        let boost = access_count as f64 * self.access_boost;
        match self.max_access_boost {
            Some(cap) => boost.min(cap),
            None => boost,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.embedding_dimension == 0 {
            return Err("embedding_dimension must be greater than 0".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be greater than 0".to_string());
        }
        if self.ef_search == 0 {
            return Err("ef_search must be greater than 0".to_string());
        }
        if !self.access_boost.is_finite() || self.access_boost < 0.0 {
            return Err("access_boost must be a non-negative number".to_string());
        }
        if let Some(cap) = self.max_access_boost {
            if !cap.is_finite() || cap < 0.0 {
                return Err("max_access_boost must be a non-negative number".to_string());
            }
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
