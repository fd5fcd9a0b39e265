//! claimcheck Verifier
//!
//! The agentic verification pipeline: classify, retrieve, judge sufficiency,
//! escalate to web search in stages, deduplicate, rerank with credibility,
//! and synthesize a verdict whose citations all point into the evidence
//! actually gathered.
//!
//! # Pipeline
//!
//! ```text
//! Classifying ─┬─ opinion / ambiguous ──────────────────────────────┐
//!              └→ Retrieving → CheckingSufficiency ─┬─ sufficient ─┐ │
//!                                                   └→ SearchTrusted │
//!                      → SearchFactCheckers ─┬─ enough ──────────┐ │ │
//!                                            └→ SearchBroad ─────┤ │ │
//!                                     Deduplicating ←────────────┴─┘ │
//!                      → FinalRerank → Synthesizing → Done ←─────────┘
//! ```
//!
//! Every decision along the way lands in the result's trace.
//!
//! # Failure policy
//!
//! Judgment failures, search failures and malformed model output all degrade
//! into a valid result (usually Not Enough Evidence). The only error a caller
//! sees from [`ClaimVerifier::verify`] is [`VerifyError::StoreUnavailable`].
//!
//! # Example Usage
//!
//! ```no_run
//! use claimcheck_llm::MockProvider;
//! use claimcheck_rerank::Reranker;
//! use claimcheck_search::{SearchConfig, StaticBackend, WebEvidenceProvider};
//! use claimcheck_store::SqliteEvidenceStore;
//! use claimcheck_verifier::{ClaimVerifier, VerifierConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteEvidenceStore::in_memory()?);
//! let web = WebEvidenceProvider::new(
//!     StaticBackend::new(),
//!     Arc::clone(&store),
//!     SearchConfig::default(),
//! );
//! let verifier = ClaimVerifier::new(
//!     MockProvider::default(),
//!     store,
//!     web,
//!     Reranker::default(),
//!     VerifierConfig::default(),
//! )?;
//!
//! let result = verifier.verify("The Earth is flat").await?;
//! println!("{} ({:.2})", result.verdict, result.confidence);
//! for entry in &result.trace {
//!     println!("  {}", entry);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod classifier;
mod config;
mod controller;
mod dedup;
mod error;
mod judgment;
mod parser;
pub mod prompt;
mod stage;
mod synthesizer;

pub use classifier::ClaimClassifier;
pub use config::VerifierConfig;
pub use controller::{ClaimVerifier, Sufficiency, CLARIFICATION_REQUEST, OPINION_REASONING};
pub use dedup::deduplicate;
pub use error::{JudgmentError, VerifyError};
pub use judgment::Judge;
pub use parser::{
    extract_json, parse_classification, parse_sufficiency, parse_synthesis, Classification,
    SufficiencyJudgment, SynthesisOutput,
};
pub use stage::{Stage, Trace, Transition};
pub use synthesizer::{Synthesis, VerdictSynthesizer, NO_EVIDENCE_REASONING};
