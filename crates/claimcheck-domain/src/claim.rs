//! Claim module - the input unit of a verification call

use std::fmt;

/// Classification of a raw claim before any retrieval happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimType {
    /// Verifiable as stated
    Factual,
    /// Subjective value judgment; cannot be falsified by evidence
    Opinion,
    /// Contains a factual component wrapped in a subjective one
    Mixed,
    /// Under-specified; needs clarification before it can be checked
    Ambiguous,
}

impl ClaimType {
    /// Get the claim type label as used in prompts and traces
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Factual => "FACTUAL",
            ClaimType::Opinion => "OPINION",
            ClaimType::Mixed => "MIXED",
            ClaimType::Ambiguous => "AMBIGUOUS",
        }
    }

    /// Parse a claim type label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FACTUAL" => Some(ClaimType::Factual),
            "OPINION" => Some(ClaimType::Opinion),
            "MIXED" => Some(ClaimType::Mixed),
            "AMBIGUOUS" => Some(ClaimType::Ambiguous),
            _ => None,
        }
    }

    /// Whether the pipeline should go on to retrieval for this type
    pub fn is_verifiable(&self) -> bool {
        matches!(self, ClaimType::Factual | ClaimType::Mixed)
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified claim
///
/// Created once per verification call and discarded afterwards. For
/// [`ClaimType::Factual`] claims the normalized text is the raw text verbatim,
/// factual errors included: errors are revealed by evidence, never pre-corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// User input, untouched
    pub raw_text: String,

    /// Claim classification
    pub classification: ClaimType,

    /// The verifiable component of the raw text
    pub normalized_text: String,

    /// Short explanation of the classification
    pub rationale: String,
}

impl Claim {
    /// Create a classified claim
    pub fn new(
        raw_text: impl Into<String>,
        classification: ClaimType,
        normalized_text: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            classification,
            normalized_text: normalized_text.into(),
            rationale: rationale.into(),
        }
    }

    /// A FACTUAL pass-through claim (normalized text equals raw text)
    pub fn factual(raw_text: impl Into<String>, rationale: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        Self {
            normalized_text: raw_text.clone(),
            raw_text,
            classification: ClaimType::Factual,
            rationale: rationale.into(),
        }
    }
}
