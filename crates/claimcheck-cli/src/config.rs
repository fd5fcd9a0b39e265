//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use claimcheck_llm::LlmConfig;
use claimcheck_rerank::RerankConfig;
use claimcheck_search::SearchConfig;
use claimcheck_store::StoreConfig;
use claimcheck_verifier::VerifierConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the web search API key
pub const SERPER_API_KEY_VAR: &str = "SERPER_API_KEY";

/// Environment variable holding the Ollama host
pub const OLLAMA_HOST_VAR: &str = "OLLAMA_HOST";

/// CLI configuration.
///
/// Every table is optional; missing tables and keys take their defaults.
///
/// ```toml
/// [settings]
/// color = true
/// format = "table"
///
/// [store]
/// db_path = "/var/lib/claimcheck/evidence.db"
///
/// [search]
/// cooldown_ms = 1000
///
/// [llm]
/// model = "llama3.1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimcheckConfig {
    /// Output settings
    pub settings: Settings,

    /// Evidence store
    pub store: StoreConfig,

    /// Relevance gate and final ranking
    pub rerank: RerankConfig,

    /// Web search
    pub search: SearchConfig,

    /// Verification pipeline
    pub verifier: VerifierConfig,

    /// Judgment model
    pub llm: LlmConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl ClaimcheckConfig {
    /// Directory holding the configuration file and the default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".claimcheck"))
    }

    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `~/.claimcheck/config.toml`
    /// is read when present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file {} not found",
                        path.display()
                    )));
                }
                Self::read(path)
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::read(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `SERPER_API_KEY` and `OLLAMA_HOST` from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(SERPER_API_KEY_VAR).ok(),
            std::env::var(OLLAMA_HOST_VAR).ok(),
        );
    }

    /// Override the search key and Ollama endpoint; blank values are ignored.
    pub fn apply_overrides(&mut self, serper_api_key: Option<String>, ollama_host: Option<String>) {
        if let Some(key) = serper_api_key.filter(|k| !k.trim().is_empty()) {
            self.search.api_key = Some(key.trim().to_string());
        }
        if let Some(host) = ollama_host.filter(|h| !h.trim().is_empty()) {
            let host = host.trim();
            // OLLAMA_HOST is commonly given as bare host:port
            self.llm.endpoint = if host.contains("://") {
                host.to_string()
            } else {
                format!("http://{}", host)
            };
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        let sections = [
            ("store", self.store.validate()),
            ("rerank", self.rerank.validate()),
            ("search", self.search.validate()),
            ("verifier", self.verifier.validate()),
            ("llm", self.llm.validate()),
        ];
        for (name, outcome) in sections {
            outcome.map_err(|e| CliError::Config(format!("[{}] {}", name, e)))?;
        }
        Ok(())
    }

    /// Database file to open.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.store.db_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::dir()?.join("evidence.db")),
        }
    }
}
