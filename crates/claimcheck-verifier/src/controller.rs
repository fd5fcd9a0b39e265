//! The verification controller

use crate::classifier::ClaimClassifier;
use crate::config::VerifierConfig;
use crate::dedup::deduplicate;
use crate::error::VerifyError;
use crate::judgment::Judge;
use crate::parser::parse_sufficiency;
use crate::prompt::{sufficiency_prompt, SUFFICIENCY_SCHEMA};
use crate::stage::{Trace, Transition};
use crate::synthesizer::VerdictSynthesizer;
use claimcheck_domain::traits::{EvidenceStore, LlmProvider};
use claimcheck_domain::{
    Claim, ClaimType, EvidenceCandidate, Health, SessionId, Verdict, VerificationResult,
};
use claimcheck_rerank::Reranker;
use claimcheck_search::{SearchStage, WebEvidenceProvider, WebSearchBackend};
use std::fmt;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Reasoning returned for opinions
pub const OPINION_REASONING: &str =
    "The claim expresses a subjective judgment; evidence cannot confirm or refute it.";

/// Clarification request returned for ambiguous claims
pub const CLARIFICATION_REQUEST: &str = "Clarification needed: the claim is too vague to check. \
     Please restate it with a specific subject and a concrete assertion.";

/// Outcome of the three-part sufficiency gate
#[derive(Debug, Clone, PartialEq)]
pub enum Sufficiency {
    /// All gates passed
    Sufficient {
        /// Judge's justification
        reason: String,
    },
    /// Quantity gate failed
    TooFew {
        /// Candidates available
        found: usize,
        /// Candidates required
        required: usize,
    },
    /// Quality gate failed
    LowRelevance {
        /// Mean relevance of the candidates
        mean: f64,
        /// Required mean relevance
        required: f64,
    },
    /// Judgment gate failed (or the judge was unavailable)
    Rejected {
        /// Judge's justification or failure
        reason: String,
    },
}

impl Sufficiency {
    /// Whether web escalation can be skipped
    pub fn is_sufficient(&self) -> bool {
        matches!(self, Sufficiency::Sufficient { .. })
    }
}

impl fmt::Display for Sufficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sufficiency::Sufficient { reason } => {
                write!(f, "Knowledge base evidence is sufficient ({})", reason)
            }
            Sufficiency::TooFew { found, required } => write!(
                f,
                "Insufficient: {} relevant candidate(s), need at least {}",
                found, required
            ),
            Sufficiency::LowRelevance { mean, required } => write!(
                f,
                "Insufficient: mean relevance {:.2} is below {:.2}",
                mean, required
            ),
            Sufficiency::Rejected { reason } => {
                write!(f, "Insufficient: judged not to settle the claim ({})", reason)
            }
        }
    }
}

/// State carried through one verification, readable after a timeout
#[derive(Default)]
struct Progress {
    trace: Trace,
    claim: Option<Claim>,
}

impl Progress {
    fn result(
        &mut self,
        raw_claim: &str,
        session_id: SessionId,
        verdict: Verdict,
        confidence: f64,
        reasoning: impl Into<String>,
        evidence: Vec<EvidenceCandidate>,
    ) -> VerificationResult {
        let (claim, classification) = match &self.claim {
            Some(claim) => (claim.normalized_text.clone(), claim.classification),
            None => (raw_claim.to_string(), ClaimType::Factual),
        };
        VerificationResult {
            claim,
            original_claim: raw_claim.to_string(),
            classification,
            verdict,
            confidence,
            reasoning: reasoning.into(),
            evidence,
            trace: std::mem::take(&mut self.trace).into_entries(),
            session_id,
        }
    }

    fn store_error(&mut self, session_id: SessionId, error: impl fmt::Display) -> VerifyError {
        let message = error.to_string();
        self.trace.record(format!("Evidence store unavailable: {}", message));
        VerifyError::StoreUnavailable {
            session_id: Some(session_id),
            trace: self.trace.entries().to_vec(),
            message,
        }
    }
}

/// Agentic claim verifier
///
/// Classifies the claim, consults the evidence store, escalates to staged
/// web search when stored evidence is not enough, and synthesizes a verdict
/// that only cites evidence gathered during the call.
///
/// Calls share nothing but the store: each gets a fresh session id and its
/// own trace.
pub struct ClaimVerifier<L, S, B> {
    classifier: ClaimClassifier<L>,
    sufficiency_judge: Judge<L>,
    synthesizer: VerdictSynthesizer<L>,
    store: Arc<S>,
    web: WebEvidenceProvider<B, S>,
    reranker: Reranker,
    config: VerifierConfig,
}

impl<L, S, B> ClaimVerifier<L, S, B>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: fmt::Display,
    S: EvidenceStore,
    S::Error: fmt::Display,
    B: WebSearchBackend,
{
    /// Create a verifier
    ///
    /// `web` should write back into the same `store`.
    pub fn new(
        llm: L,
        store: Arc<S>,
        web: WebEvidenceProvider<B, S>,
        reranker: Reranker,
        config: VerifierConfig,
    ) -> Result<Self, VerifyError> {
        config.validate().map_err(VerifyError::Config)?;
        reranker.config().validate().map_err(VerifyError::Config)?;
        web.config().validate().map_err(VerifyError::Config)?;

        let judge = Judge::new(Arc::new(llm), config.judgment_timeout());
        Ok(Self {
            classifier: ClaimClassifier::new(judge.clone()),
            sufficiency_judge: judge.clone(),
            synthesizer: VerdictSynthesizer::new(judge),
            store,
            web,
            reranker,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// The shared evidence store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Store statistics
    pub fn health(&self) -> Result<Health, VerifyError> {
        let document_count = self
            .store
            .count()
            .map_err(|e| VerifyError::StoreUnavailable {
                session_id: None,
                trace: Vec::new(),
                message: e.to_string(),
            })?;
        Ok(Health { document_count })
    }

    /// Verify one claim
    ///
    /// # Errors
    ///
    /// Only [`VerifyError::StoreUnavailable`]; every other failure degrades
    /// into a valid result. Running out of time yields Not Enough Evidence
    /// with a timeout entry in the trace.
    pub async fn verify(&self, raw_claim: &str) -> Result<VerificationResult, VerifyError> {
        let session_id = SessionId::new();
        let mut progress = Progress::default();
        info!(%session_id, "Verifying claim");

        let budget = self.config.verification_timeout();
        let outcome = timeout(budget, self.run(raw_claim, session_id, &mut progress)).await;

        match outcome {
            Ok(result) => result,
            Err(_) => {
                warn!(%session_id, ?budget, "Verification timed out");
                progress.trace.record(format!(
                    "Timed out after {}s; returning Not Enough Evidence",
                    budget.as_secs()
                ));
                Ok(progress.result(
                    raw_claim,
                    session_id,
                    Verdict::NotEnoughEvidence,
                    0.0,
                    "Verification did not finish in time; no verdict could be reached.",
                    Vec::new(),
                ))
            }
        }
    }

    async fn run(
        &self,
        raw_claim: &str,
        session_id: SessionId,
        progress: &mut Progress,
    ) -> Result<VerificationResult, VerifyError> {
        // Classifying
        let claim = self.classifier.classify(raw_claim).await;
        progress.trace.record(format!(
            "Claim type: {} ({})",
            claim.classification, claim.rationale
        ));
        let classification = claim.classification;
        let text = claim.normalized_text.clone();
        progress.claim = Some(claim);

        match classification {
            ClaimType::Opinion => {
                progress
                    .trace
                    .record("Opinion cannot be checked against evidence; skipping retrieval");
                progress.trace.advance(Transition::ShortCircuit);
                return Ok(progress.result(
                    raw_claim,
                    session_id,
                    Verdict::NotVerifiable,
                    0.0,
                    OPINION_REASONING,
                    Vec::new(),
                ));
            }
            ClaimType::Ambiguous => {
                progress.trace.record(CLARIFICATION_REQUEST);
                progress.trace.advance(Transition::ShortCircuit);
                return Ok(progress.result(
                    raw_claim,
                    session_id,
                    Verdict::NotEnoughEvidence,
                    0.0,
                    CLARIFICATION_REQUEST,
                    Vec::new(),
                ));
            }
            ClaimType::Factual | ClaimType::Mixed => {}
        }
        progress.trace.record(format!("Normalized claim: \"{}\"", text));
        progress.trace.advance(Transition::Proceed);

        // Retrieving
        let hits = match self.store.query(&text, self.config.retrieval_top_k) {
            Ok(hits) => hits,
            Err(e) => return Err(progress.store_error(session_id, e)),
        };
        let retrieved = hits.len();
        let candidates = hits.iter().map(EvidenceCandidate::from_scored).collect();
        let kb = self
            .reranker
            .rerank(&text, candidates, self.config.rerank_top_k);
        for id in kb.iter().filter_map(|c| c.evidence_id) {
            if let Err(e) = self.store.increment_access(id) {
                warn!(%id, error = %e, "Failed to record evidence access");
            }
        }
        progress.trace.record(format!(
            "Retrieved {} candidate(s) from the knowledge base; {} passed the relevance gate",
            retrieved,
            kb.len()
        ));
        progress.trace.advance(Transition::Proceed);

        // CheckingSufficiency
        let sufficiency = self.check_sufficiency(&text, &kb).await;
        progress.trace.record(sufficiency.to_string());
        let mut pool = kb;

        if sufficiency.is_sufficient() {
            progress.trace.advance(Transition::Sufficient);
        } else {
            progress.trace.advance(Transition::Insufficient);
            let mut relevant = pool.len();

            let trusted = self
                .search_stage(SearchStage::Trusted, &text, &mut progress.trace)
                .await;
            relevant += self.count_relevant(&trusted);
            pool.extend(trusted);
            progress.trace.advance(Transition::Proceed);

            let fact_checks = self
                .search_stage(SearchStage::FactCheckers, &text, &mut progress.trace)
                .await;
            relevant += self.count_relevant(&fact_checks);
            pool.extend(fact_checks);

            if relevant < self.config.broad_search_threshold {
                progress.trace.record(format!(
                    "{} relevant candidate(s) so far; widening to the open web",
                    relevant
                ));
                progress.trace.advance(Transition::Insufficient);
                let broad = self
                    .search_stage(SearchStage::Broad, &text, &mut progress.trace)
                    .await;
                pool.extend(broad);
                progress.trace.advance(Transition::Proceed);
            } else {
                progress.trace.record(format!(
                    "{} relevant candidate(s) so far; broad search not needed",
                    relevant
                ));
                progress.trace.advance(Transition::Sufficient);
            }
        }

        // Deduplicating
        let before = pool.len();
        let pool = deduplicate(pool);
        progress.trace.record(format!(
            "Deduplicated {} candidate(s) to {}",
            before,
            pool.len()
        ));
        progress.trace.advance(Transition::Proceed);

        // FinalRerank
        let mut evidence =
            self.reranker
                .rerank_with_credibility(&text, pool, self.config.rerank_top_k);
        evidence.retain(|c| c.final_score.is_some_and(|s| s > 0.0));
        progress.trace.record(format!(
            "{} evidence item(s) passed to the verdict step",
            evidence.len()
        ));
        progress.trace.advance(Transition::Proceed);

        // Synthesizing
        let synthesis = self.synthesizer.synthesize(&text, &evidence).await;
        if !synthesis.model_called {
            progress
                .trace
                .record("No evidence survived ranking; verdict step skipped");
        }
        if let Some(reason) = &synthesis.fallback {
            progress
                .trace
                .record(format!("Verdict output rejected: {}", reason));
        }
        progress.trace.record(format!(
            "Verdict: {} (confidence {:.2})",
            synthesis.verdict, synthesis.confidence
        ));
        progress.trace.advance(Transition::Proceed);

        info!(
            %session_id,
            verdict = %synthesis.verdict,
            evidence = evidence.len(),
            "Verification complete"
        );
        Ok(progress.result(
            raw_claim,
            session_id,
            synthesis.verdict,
            synthesis.confidence,
            synthesis.reasoning,
            evidence,
        ))
    }

    /// Quantity, then quality, then judgment; the first failing gate decides
    async fn check_sufficiency(&self, claim: &str, kb: &[EvidenceCandidate]) -> Sufficiency {
        if kb.len() < self.config.min_evidence_count {
            return Sufficiency::TooFew {
                found: kb.len(),
                required: self.config.min_evidence_count,
            };
        }

        let mean = kb
            .iter()
            .map(|c| c.relevance.unwrap_or(c.score))
            .sum::<f64>()
            / kb.len() as f64;
        if mean < self.config.min_mean_relevance {
            return Sufficiency::LowRelevance {
                mean,
                required: self.config.min_mean_relevance,
            };
        }

        let judged = self
            .sufficiency_judge
            .ask(sufficiency_prompt(claim, kb), SUFFICIENCY_SCHEMA)
            .await
            .and_then(|response| parse_sufficiency(&response));
        match judged {
            Ok(judgment) if judgment.sufficient => Sufficiency::Sufficient {
                reason: judgment.reason,
            },
            Ok(judgment) => Sufficiency::Rejected {
                reason: judgment.reason,
            },
            Err(e) => {
                debug!(error = %e, "Sufficiency judgment unavailable");
                Sufficiency::Rejected {
                    reason: format!("judgment unavailable: {}", e),
                }
            }
        }
    }

    /// Run one search stage; failures are traced and yield no candidates
    async fn search_stage(
        &self,
        stage: SearchStage,
        claim: &str,
        trace: &mut Trace,
    ) -> Vec<EvidenceCandidate> {
        match self.web.search(stage, claim).await {
            Ok(mut found) => {
                for candidate in &mut found {
                    let relevance = self.reranker.relevance(claim, &candidate.text);
                    candidate.relevance = Some(relevance);
                    candidate.score = relevance;
                }
                trace.record(format!(
                    "Searched {}: {} result(s), {} relevant",
                    stage,
                    found.len(),
                    self.count_relevant(&found)
                ));
                found
            }
            Err(e) => {
                warn!(stage = %stage, error = %e, "Search stage unavailable");
                trace.record(format!(
                    "Search of {} unavailable ({}); continuing with existing evidence",
                    stage, e
                ));
                Vec::new()
            }
        }
    }

    fn count_relevant(&self, candidates: &[EvidenceCandidate]) -> usize {
        candidates
            .iter()
            .filter(|c| c.relevance.is_some_and(|r| self.reranker.is_relevant(r)))
            .count()
    }
}
