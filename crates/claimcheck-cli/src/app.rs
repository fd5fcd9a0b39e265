//! Wiring of the store, judgment model, web search and verifier.

use crate::config::ClaimcheckConfig;
use crate::error::Result;
use claimcheck_llm::OllamaProvider;
use claimcheck_rerank::Reranker;
use claimcheck_search::{
    SearchConfig, SerperBackend, StaticBackend, WebEvidenceProvider, WebSearchBackend,
};
use claimcheck_store::SqliteEvidenceStore;
use claimcheck_verifier::ClaimVerifier;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// The verifier as assembled by the CLI.
pub type Verifier = ClaimVerifier<OllamaProvider, SqliteEvidenceStore, Box<dyn WebSearchBackend>>;

/// Open the configured evidence store, creating its directory if needed.
pub fn open_store(config: &ClaimcheckConfig) -> Result<(Arc<SqliteEvidenceStore>, PathBuf)> {
    let path = config.db_path()?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteEvidenceStore::open_with_config(&path, config.store.clone())?;
    info!(path = %path.display(), "Opened evidence store");
    Ok((Arc::new(store), path))
}

/// Serper when an API key is configured, otherwise a backend with no results.
pub fn web_backend(config: &SearchConfig) -> Box<dyn WebSearchBackend> {
    match config.api_key.as_deref() {
        Some(key) => Box::new(SerperBackend::new(key, config.request_timeout())),
        None => {
            warn!("No search API key configured; web search will return nothing");
            Box::new(StaticBackend::new())
        }
    }
}

/// Assemble a verifier over `store`.
pub fn build_verifier(
    config: &ClaimcheckConfig,
    store: Arc<SqliteEvidenceStore>,
) -> Result<Verifier> {
    let llm = OllamaProvider::from_config(&config.llm);
    let web = WebEvidenceProvider::new(
        web_backend(&config.search),
        Arc::clone(&store),
        config.search.clone(),
    );
    let reranker = Reranker::new(config.rerank.clone());
    Ok(ClaimVerifier::new(
        llm,
        store,
        web,
        reranker,
        config.verifier.clone(),
    )?)
}
