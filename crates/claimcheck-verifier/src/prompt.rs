//! Prompts for the three judgment calls
//!
//! Each prompt opens with a `TASK:` marker line and carries the claim on a
//! `CLAIM:` line, so providers (and test doubles) can route on them.

use claimcheck_domain::{EvidenceCandidate, Verdict};

/// Marker for claim classification prompts
pub const CLASSIFY_TASK: &str = "TASK: CLASSIFY_CLAIM";

/// Marker for sufficiency judgment prompts
pub const SUFFICIENCY_TASK: &str = "TASK: JUDGE_SUFFICIENCY";

/// Marker for verdict synthesis prompts
pub const SYNTHESIS_TASK: &str = "TASK: SYNTHESIZE_VERDICT";

/// Evidence lines shown to the sufficiency judge
const SUFFICIENCY_CONTEXT_LIMIT: usize = 5;

/// JSON schema for classification output
pub const CLASSIFICATION_SCHEMA: &str = r#"{"type":"object","properties":{"type":{"type":"string","enum":["FACTUAL","OPINION","MIXED","AMBIGUOUS"]},"normalized_claim":{"type":"string"},"rationale":{"type":"string"}},"required":["type","normalized_claim","rationale"]}"#;

/// JSON schema for sufficiency output
pub const SUFFICIENCY_SCHEMA: &str = r#"{"type":"object","properties":{"sufficient":{"type":"boolean"},"reason":{"type":"string"}},"required":["sufficient"]}"#;

/// JSON schema for synthesis output
pub const SYNTHESIS_SCHEMA: &str = r#"{"type":"object","properties":{"verdict":{"type":"string"},"confidence":{"type":"number","minimum":0,"maximum":1},"reasoning":{"type":"string"}},"required":["verdict","confidence","reasoning"]}"#;

const CLASSIFY_INSTRUCTIONS: &str = r#"Classify the user's statement before it is fact-checked.

Types:
- FACTUAL: a verifiable assertion about the world. Copy it unchanged into normalized_claim, including any errors. Do NOT correct it.
- OPINION: a subjective preference or value judgment that evidence cannot settle.
- MIXED: a verifiable assertion wrapped in a subjective judgment. Put only the verifiable part in normalized_claim and drop the subjective modifier (superlatives, "better", "best", "greatest").
- AMBIGUOUS: too vague to check (no clear subject or assertion).

Output format (JSON object only, no additional text):
{"type": "FACTUAL|OPINION|MIXED|AMBIGUOUS", "normalized_claim": "...", "rationale": "one sentence"}"#;

const SUFFICIENCY_INSTRUCTIONS: &str = r#"Decide whether the evidence below is SUFFICIENT to verify or refute the claim.
Evidence is sufficient only if it directly addresses the claim's assertion, not merely its topic.

Output format (JSON object only, no additional text):
{"sufficient": true|false, "reason": "one sentence"}"#;

const SYNTHESIS_RULES: &str = r#"You are a rigorous fact-checking assistant. Judge the claim using ONLY the numbered evidence.

RULES:
- Cite evidence with [1], [2], etc. matching the numbers below.
- Never cite a number that is not listed. Never invent sources or evidence.
- If evidence is contradictory, explain both sides.
- If the evidence does not settle the claim, the verdict MUST be "Not Enough Evidence"."#;

/// Classification prompt for a raw claim
pub fn classification_prompt(raw_claim: &str) -> String {
    format!(
        "{}\n\n{}\n\nCLAIM: {}\n",
        CLASSIFY_TASK, CLASSIFY_INSTRUCTIONS, raw_claim
    )
}

/// Sufficiency prompt over the top knowledge-base candidates
pub fn sufficiency_prompt(claim: &str, evidence: &[EvidenceCandidate]) -> String {
    let mut prompt = String::new();
    prompt.push_str(SUFFICIENCY_TASK);
    prompt.push_str("\n\n");
    prompt.push_str(SUFFICIENCY_INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(&format!("CLAIM: {}\n\nEVIDENCE:\n", claim));
    for candidate in evidence.iter().take(SUFFICIENCY_CONTEXT_LIMIT) {
        prompt.push_str(&format!(
            "- {} (relevance={:.2})\n",
            candidate.text,
            candidate.relevance.unwrap_or(candidate.score)
        ));
    }
    prompt
}

/// Verdict prompt with evidence numbered from 1
pub fn synthesis_prompt(claim: &str, evidence: &[EvidenceCandidate]) -> String {
    let allowed = [
        Verdict::True,
        Verdict::False,
        Verdict::PartiallyTrue,
        Verdict::Misleading,
        Verdict::NotEnoughEvidence,
    ]
    .iter()
    .map(|v| v.label())
    .collect::<Vec<_>>()
    .join(", ");

    let mut prompt = String::new();
    prompt.push_str(SYNTHESIS_TASK);
    prompt.push_str("\n\n");
    prompt.push_str(SYNTHESIS_RULES);
    prompt.push_str(&format!("\n- Allowed verdicts: {}\n", allowed));
    prompt.push_str(&format!("- Valid citations: [1] to [{}]\n\n", evidence.len()));

    prompt.push_str(&format!("CLAIM: {}\n\nEVIDENCE:\n", claim));
    for (i, candidate) in evidence.iter().enumerate() {
        prompt.push_str(&format!(
            "[{}] (Source: {}, Origin: {}, Relevance: {:.2}, Credibility: {:.2})\n{}\n\n",
            i + 1,
            candidate.source_url,
            candidate.origin,
            candidate.relevance.unwrap_or(candidate.score),
            candidate.credibility,
            candidate.text
        ));
    }

    prompt.push_str(
        "Output format (JSON object only, no additional text):\n\
         {\"verdict\": \"<allowed verdict>\", \"confidence\": <0.0-1.0>, \"reasoning\": \"<reasoning with [n] citations>\"}",
    );
    prompt
}
