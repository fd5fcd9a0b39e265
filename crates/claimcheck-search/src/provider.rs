//! Staged web evidence retrieval with store write-back

use crate::{SearchConfig, SearchError, SearchHit, SearchRequest, WebSearchBackend};
use claimcheck_domain::credibility::{FACT_CHECK_DOMAINS, TRUSTED_NEWS_DOMAINS};
use claimcheck_domain::traits::EvidenceStore;
use claimcheck_domain::{EvidenceCandidate, EvidenceId, NewEvidence, Origin, SourceType};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Escalation tier of a web search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    /// High-credibility news outlets
    Trusted,
    /// Dedicated fact-checking sites
    FactCheckers,
    /// Unrestricted search
    Broad,
}

impl SearchStage {
    /// Origin tag for candidates found at this stage
    pub fn origin(&self) -> Origin {
        match self {
            SearchStage::Trusted => Origin::WebTrusted,
            SearchStage::FactCheckers => Origin::WebFactCheck,
            SearchStage::Broad => Origin::WebBroad,
        }
    }

    /// Domain restriction for this stage
    pub fn domains(&self) -> &'static [&'static str] {
        match self {
            SearchStage::Trusted => TRUSTED_NEWS_DOMAINS,
            SearchStage::FactCheckers => FACT_CHECK_DOMAINS,
            SearchStage::Broad => &[],
        }
    }

    /// Result limit for this stage
    pub fn max_results(&self, config: &SearchConfig) -> usize {
        match self {
            SearchStage::Trusted => config.trusted_max_results,
            SearchStage::FactCheckers => config.fact_check_max_results,
            SearchStage::Broad => config.broad_max_results,
        }
    }

    /// Source type recorded for written-back results, if the stage implies one
    pub fn source_type_hint(&self) -> Option<SourceType> {
        match self {
            SearchStage::FactCheckers => Some(SourceType::FactChecker),
            _ => None,
        }
    }

    /// Human-readable stage name
    pub fn label(&self) -> &'static str {
        match self {
            SearchStage::Trusted => "trusted news",
            SearchStage::FactCheckers => "fact-checkers",
            SearchStage::Broad => "broad web",
        }
    }
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Web search front-end that writes every snippet back into the store
///
/// Backend calls are serialised: each waits for the configured cooldown
/// since the previous call finished, whichever verification issued it.
pub struct WebEvidenceProvider<B, S> {
    backend: B,
    store: Arc<S>,
    config: SearchConfig,
    last_call: Mutex<Option<Instant>>,
}

impl<B, S> WebEvidenceProvider<B, S>
where
    B: WebSearchBackend,
    S: EvidenceStore,
    S::Error: fmt::Display,
{
    /// Create a provider
    pub fn new(backend: B, store: Arc<S>, config: SearchConfig) -> Self {
        Self {
            backend,
            store,
            config,
            last_call: Mutex::new(None),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Search trusted news domains
    pub async fn search_trusted(&self, claim: &str) -> Result<Vec<EvidenceCandidate>, SearchError> {
        self.search(SearchStage::Trusted, claim).await
    }

    /// Search fact-checking sites
    pub async fn search_fact_checkers(
        &self,
        claim: &str,
    ) -> Result<Vec<EvidenceCandidate>, SearchError> {
        self.search(SearchStage::FactCheckers, claim).await
    }

    /// Search without domain restriction
    pub async fn search_broad(&self, claim: &str) -> Result<Vec<EvidenceCandidate>, SearchError> {
        self.search(SearchStage::Broad, claim).await
    }

    /// Run one stage: search with retry, write back, convert to candidates
    ///
    /// Only rate-limit errors are retried. A failed write-back is logged and
    /// the candidates are still returned, without store ids.
    pub async fn search(
        &self,
        stage: SearchStage,
        claim: &str,
    ) -> Result<Vec<EvidenceCandidate>, SearchError> {
        let request = SearchRequest::new(claim, stage.domains(), stage.max_results(&self.config));
        let hits = self.search_with_retry(&request).await?;

        let hits: Vec<SearchHit> = hits
            .into_iter()
            .map(|mut hit| {
                hit.snippet = hit.snippet.trim().to_string();
                hit
            })
            .filter(|hit| !hit.snippet.is_empty())
            .collect();

        let ids = self.write_back(stage, &hits);

        let candidates: Vec<EvidenceCandidate> = hits
            .into_iter()
            .enumerate()
            .map(|(i, hit)| {
                let id = ids.as_ref().and_then(|ids| ids.get(i).copied());
                let mut candidate =
                    EvidenceCandidate::from_web(hit.snippet, hit.url, stage.origin(), id);
                if let Some(source_type) = stage.source_type_hint() {
                    candidate.source_type = source_type;
                }
                candidate
            })
            .collect();

        info!(
            stage = %stage,
            backend = self.backend.name(),
            results = candidates.len(),
            "Web search stage complete"
        );
        Ok(candidates)
    }

    fn write_back(&self, stage: SearchStage, hits: &[SearchHit]) -> Option<Vec<EvidenceId>> {
        if hits.is_empty() {
            return Some(Vec::new());
        }

        let batch: Vec<NewEvidence> = hits
            .iter()
            .map(|hit| {
                let mut evidence =
                    NewEvidence::new(hit.snippet.clone(), hit.url.clone()).with_details(&hit.title);
                if let Some(source_type) = stage.source_type_hint() {
                    evidence = evidence.with_source_type(source_type);
                }
                evidence
            })
            .collect();

        match self.store.insert_batch(batch) {
            Ok(ids) => {
                debug!(stage = %stage, written = ids.len(), "Wrote web evidence to store");
                Some(ids)
            }
            Err(e) => {
                warn!(stage = %stage, error = %e, "Failed to write web evidence to store");
                None
            }
        }
    }

    async fn search_with_retry(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.call_backend(request).await {
                Err(e) if e.is_rate_limited() && attempt < self.config.max_attempts => {
                    let delay = self.config.backoff_for(attempt);
                    warn!(attempt, ?delay, "Search rate limited, backing off");
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn call_backend(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
        let mut last_call = self.last_call.lock().await;
        if let Some(finished) = *last_call {
            let cooldown = self.config.cooldown();
            let elapsed = finished.elapsed();
            if elapsed < cooldown {
                tokio::time::sleep(cooldown - elapsed).await;
            }
        }

        let timeout = self.config.request_timeout();
        let result = match tokio::time::timeout(timeout, self.backend.search(request)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(timeout)),
        };
        *last_call = Some(Instant::now());
        result
    }
}
