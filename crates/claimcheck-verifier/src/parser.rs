//! Parse judgment responses into typed outputs

use crate::error::JudgmentError;
use claimcheck_domain::{ClaimType, Verdict};
use serde::Deserialize;

/// Classification as returned by the model
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Claim type
    pub claim_type: ClaimType,
    /// Verifiable component of the claim
    pub normalized_claim: String,
    /// One-line justification
    pub rationale: String,
}

/// Sufficiency judgment as returned by the model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SufficiencyJudgment {
    /// Whether the evidence directly settles the claim
    pub sufficient: bool,
    /// Justification
    #[serde(default)]
    pub reason: String,
}

/// Verdict as returned by the model, before citation checks
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutput {
    /// Parsed verdict
    pub verdict: Verdict,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Reasoning with `[n]` citations
    pub reasoning: String,
}

#[derive(Deserialize)]
struct RawClassification {
    #[serde(rename = "type")]
    claim_type: String,
    #[serde(default)]
    normalized_claim: String,
    #[serde(default)]
    rationale: String,
}

#[derive(Deserialize)]
struct RawSynthesis {
    verdict: String,
    confidence: f64,
    reasoning: String,
}

/// Extract the JSON object from a response
///
/// Tolerates markdown code fences and prose around the object.
pub fn extract_json(response: &str) -> Result<&str, JudgmentError> {
    let trimmed = response.trim();
    let unfenced = match trimmed.strip_prefix("```") {
        Some(rest) => {
            // Drop the language tag line and the closing fence
            let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
            body.trim_end().trim_end_matches("```")
        }
        None => trimmed,
    };

    let start = unfenced.find('{');
    let end = unfenced.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&unfenced[start..=end]),
        _ => Err(JudgmentError::Malformed("no JSON object in response".to_string())),
    }
}

/// Parse a classification response
pub fn parse_classification(response: &str) -> Result<Classification, JudgmentError> {
    let raw: RawClassification = serde_json::from_str(extract_json(response)?)?;
    let claim_type = ClaimType::parse(&raw.claim_type)
        .ok_or_else(|| JudgmentError::Malformed(format!("unknown claim type '{}'", raw.claim_type)))?;
    Ok(Classification {
        claim_type,
        normalized_claim: raw.normalized_claim.trim().to_string(),
        rationale: raw.rationale.trim().to_string(),
    })
}

/// Parse a sufficiency response
///
/// A bare `yes` / `no` answer is accepted as well as the JSON object.
pub fn parse_sufficiency(response: &str) -> Result<SufficiencyJudgment, JudgmentError> {
    let lowered = response.trim().to_lowercase();
    if lowered.starts_with("yes") {
        return Ok(SufficiencyJudgment {
            sufficient: true,
            reason: String::new(),
        });
    }
    if lowered.starts_with("no") {
        return Ok(SufficiencyJudgment {
            sufficient: false,
            reason: String::new(),
        });
    }
    Ok(serde_json::from_str(extract_json(response)?)?)
}

/// Parse a synthesis response
pub fn parse_synthesis(response: &str) -> Result<SynthesisOutput, JudgmentError> {
    let raw: RawSynthesis = serde_json::from_str(extract_json(response)?)?;
    let verdict = Verdict::parse(&raw.verdict)
        .ok_or_else(|| JudgmentError::Malformed(format!("unknown verdict '{}'", raw.verdict)))?;
    let confidence = if raw.confidence.is_finite() {
        raw.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };
    Ok(SynthesisOutput {
        verdict,
        confidence,
        reasoning: raw.reasoning.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_fence() {
        let response = "```json\n{\"sufficient\": true}\n```";
        assert_eq!(extract_json(response).unwrap(), "{\"sufficient\": true}");
    }

    #[test]
    fn test_extract_json_from_prose() {
        let response = "Sure! Here it is: {\"a\": 1} Hope that helps.";
        assert_eq!(extract_json(response).unwrap(), "{\"a\": 1}");
        assert!(extract_json("no json here").is_err());
    }

    #[test]
    fn test_parse_classification() {
        let parsed = parse_classification(
            r#"{"type":"mixed","normalized_claim":" Minecraft is a 2D game ","rationale":"superlative"}"#,
        )
        .unwrap();
        assert_eq!(parsed.claim_type, ClaimType::Mixed);
        assert_eq!(parsed.normalized_claim, "Minecraft is a 2D game");
    }

    #[test]
    fn test_parse_classification_rejects_unknown_type() {
        let result = parse_classification(r#"{"type":"SARCASM","normalized_claim":"x"}"#);
        assert!(matches!(result, Err(JudgmentError::Malformed(_))));
        assert!(parse_classification("I think it's factual").is_err());
    }

    #[test]
    fn test_parse_sufficiency_variants() {
        assert!(parse_sufficiency("Yes.").unwrap().sufficient);
        assert!(!parse_sufficiency("no").unwrap().sufficient);
        let judged = parse_sufficiency(r#"{"sufficient": false, "reason": "off topic"}"#).unwrap();
        assert!(!judged.sufficient);
        assert_eq!(judged.reason, "off topic");
        assert!(parse_sufficiency("maybe").is_err());
    }

    #[test]
    fn test_parse_synthesis_clamps_confidence() {
        let parsed =
            parse_synthesis(r#"{"verdict":"False","confidence":1.7,"reasoning":"NASA says so [1]."}"#)
                .unwrap();
        assert_eq!(parsed.verdict, Verdict::False);
        assert_eq!(parsed.confidence, 1.0);

        let parsed =
            parse_synthesis(r#"{"verdict":"True","confidence":-0.2,"reasoning":"[1]"}"#).unwrap();
        assert_eq!(parsed.confidence, 0.0);
    }

    #[test]
    fn test_parse_synthesis_requires_fields() {
        assert!(parse_synthesis(r#"{"verdict":"False","reasoning":"x"}"#).is_err());
        assert!(parse_synthesis(r#"{"verdict":"Probably","confidence":0.5,"reasoning":"x"}"#).is_err());
        assert!(parse_synthesis("The claim is false.").is_err());
    }
}
