//! Claim classification with FACTUAL fallback

use crate::judgment::Judge;
use crate::parser::parse_classification;
use crate::prompt::{classification_prompt, CLASSIFICATION_SCHEMA};
use claimcheck_domain::traits::LlmProvider;
use claimcheck_domain::{Claim, ClaimType};
use std::fmt;
use tracing::{debug, warn};

/// Decides whether a claim is checkable and extracts its verifiable part
///
/// Never fails: when the model is unavailable or answers out of contract,
/// the claim is treated as FACTUAL with its text unchanged.
pub struct ClaimClassifier<L> {
    judge: Judge<L>,
}

impl<L> ClaimClassifier<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: fmt::Display,
{
    /// Create a classifier
    pub fn new(judge: Judge<L>) -> Self {
        Self { judge }
    }

    /// Classify a raw claim
    pub async fn classify(&self, raw_text: &str) -> Claim {
        if raw_text.trim().is_empty() {
            return Claim::new(raw_text, ClaimType::Ambiguous, raw_text, "Empty claim");
        }

        let response = match self
            .judge
            .ask(classification_prompt(raw_text), CLASSIFICATION_SCHEMA)
            .await
        {
            Ok(response) => response,
            Err(e) => return Self::fallback(raw_text, e),
        };

        let parsed = match parse_classification(&response) {
            Ok(parsed) => parsed,
            Err(e) => return Self::fallback(raw_text, e),
        };
        debug!(claim_type = %parsed.claim_type, "Claim classified");

        match parsed.claim_type {
            // Factual claims are checked exactly as stated, errors included
            ClaimType::Factual => Claim::factual(raw_text, parsed.rationale),
            ClaimType::Mixed if parsed.normalized_claim.is_empty() => {
                Self::fallback(raw_text, "MIXED claim without a factual component")
            }
            ClaimType::Mixed => Claim::new(
                raw_text,
                ClaimType::Mixed,
                parsed.normalized_claim,
                parsed.rationale,
            ),
            other => Claim::new(raw_text, other, raw_text, parsed.rationale),
        }
    }

    fn fallback(raw_text: &str, reason: impl fmt::Display) -> Claim {
        warn!(%reason, "Classification unavailable, treating claim as factual");
        Claim::factual(
            raw_text,
            format!("Classification unavailable ({}); treating as factual", reason),
        )
    }
}
