//! Citation-checked verdict synthesis

use crate::judgment::Judge;
use crate::parser::parse_synthesis;
use crate::prompt::{synthesis_prompt, SYNTHESIS_SCHEMA};
use claimcheck_domain::traits::LlmProvider;
use claimcheck_domain::verdict::citation_indices;
use claimcheck_domain::{EvidenceCandidate, Verdict};
use std::fmt;
use tracing::{debug, warn};

/// Reasoning used when there is nothing to reason over
pub const NO_EVIDENCE_REASONING: &str =
    "No supporting or contradicting evidence was found in the knowledge base or on the web.";

/// A verdict ready to return
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Final verdict
    pub verdict: Verdict,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Reasoning; every `[n]` indexes the evidence list
    pub reasoning: String,
    /// Why the model's answer was replaced, if it was
    pub fallback: Option<String>,
    /// Whether the model was called
    pub model_called: bool,
}

impl Synthesis {
    fn not_enough(reasoning: impl Into<String>, fallback: Option<String>, model_called: bool) -> Self {
        Self {
            verdict: Verdict::NotEnoughEvidence,
            confidence: 0.0,
            reasoning: reasoning.into(),
            fallback,
            model_called,
        }
    }
}

/// Turns ranked evidence into a verdict that cites only that evidence
///
/// The model's answer is rejected, and replaced with Not Enough Evidence,
/// when it does not parse, when it cites a number outside `1..=n`, or when
/// it asserts a substantive verdict without citing anything.
pub struct VerdictSynthesizer<L> {
    judge: Judge<L>,
}

impl<L> VerdictSynthesizer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: fmt::Display,
{
    /// Create a synthesizer
    pub fn new(judge: Judge<L>) -> Self {
        Self { judge }
    }

    /// Produce a verdict for `claim` from `evidence`
    pub async fn synthesize(&self, claim: &str, evidence: &[EvidenceCandidate]) -> Synthesis {
        if evidence.is_empty() {
            return Synthesis::not_enough(NO_EVIDENCE_REASONING, None, false);
        }

        let response = match self
            .judge
            .ask(synthesis_prompt(claim, evidence), SYNTHESIS_SCHEMA)
            .await
        {
            Ok(response) => response,
            Err(e) => return Self::rejected(format!("verdict step failed: {}", e)),
        };

        let output = match parse_synthesis(&response) {
            Ok(output) => output,
            Err(e) => return Self::rejected(format!("verdict could not be parsed: {}", e)),
        };

        let citations = citation_indices(&output.reasoning);
        if let Some(bad) = citations.iter().find(|&&n| n == 0 || n > evidence.len()) {
            return Self::rejected(format!(
                "reasoning cited [{}] but only {} evidence item(s) exist",
                bad,
                evidence.len()
            ));
        }
        if output.verdict.is_substantive() && citations.is_empty() {
            return Self::rejected(format!("verdict '{}' cited no evidence", output.verdict));
        }

        // Evidence was retrieved, so the claim was judged checkable
        let verdict = match output.verdict {
            Verdict::NotVerifiable => Verdict::NotEnoughEvidence,
            other => other,
        };
        debug!(%verdict, confidence = output.confidence, "Verdict synthesized");

        Synthesis {
            verdict,
            confidence: output.confidence,
            reasoning: output.reasoning,
            fallback: None,
            model_called: true,
        }
    }

    fn rejected(reason: String) -> Synthesis {
        warn!(%reason, "Falling back to Not Enough Evidence");
        Synthesis::not_enough(
            "The evidence could not be turned into a reliable verdict; no sources are cited.",
            Some(reason),
            true,
        )
    }
}
