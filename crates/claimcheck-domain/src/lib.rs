//! claimcheck Domain Layer
//!
//! This crate contains the data model and trait interfaces for the claim
//! verification pipeline. Apart from `uuid` it has no external dependencies;
//! storage, model inference and web access live in other crates.
//!
//! ## Key Concepts
//!
//! - **Claim**: A short user-supplied assertion, classified before any retrieval
//! - **Evidence**: An atomic snippet with a source, stored once and reused
//! - **Candidate**: A per-call view of evidence carrying scores and an origin tag
//! - **Credibility**: A per-domain trust score in [0, 1] that adjusts ranking
//! - **Verdict**: The six-way final classification of a claim
//!
//! ## Architecture
//!
//! - Pure data and pure functions only
//! - Trait definitions for every external collaborator (store, scorer, LLM)
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod credibility;
pub mod evidence;
pub mod text;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use claim::{Claim, ClaimType};
pub use evidence::{
    EvidenceCandidate, EvidenceDocument, EvidenceId, NewEvidence, Origin, ScoredEvidence,
    SourceType,
};
pub use verdict::{Health, SessionId, Verdict, VerificationResult};
