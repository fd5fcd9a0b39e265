//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{EvidenceDocument, EvidenceId, NewEvidence, ScoredEvidence};

/// Trait for storing and searching evidence documents
///
/// Implemented by the infrastructure layer (claimcheck-store). Methods take
/// `&self` so one store can be shared by concurrent verification calls;
/// implementations synchronise internally.
pub trait EvidenceStore: Send + Sync {
    /// Error type for store operations
    type Error;

    /// Insert one document and return its id
    fn insert(&self, evidence: NewEvidence) -> Result<EvidenceId, Self::Error>;

    /// Insert several documents, returning ids in input order
    fn insert_batch(&self, evidence: Vec<NewEvidence>) -> Result<Vec<EvidenceId>, Self::Error>;

    /// Nearest-neighbour search, sorted by popularity-boosted score
    fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredEvidence>, Self::Error>;

    /// Record that a document cleared the relevance gate
    fn increment_access(&self, id: EvidenceId) -> Result<(), Self::Error>;

    /// Get a document by id
    fn get(&self, id: EvidenceId) -> Result<Option<EvidenceDocument>, Self::Error>;

    /// Number of stored documents
    fn count(&self) -> Result<usize, Self::Error>;
}

/// Joint relevance scorer over a (claim, evidence) pair
///
/// Scores are unbounded and only comparable within one scorer.
pub trait RelevanceScorer: Send + Sync {
    /// Score how directly `evidence` addresses `claim`
    fn score(&self, claim: &str, evidence: &str) -> f64;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (claimcheck-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with structured output (if supported)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
