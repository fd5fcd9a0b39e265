//! Deterministic joint relevance scorer
//!
//! Compares a claim and a piece of evidence token by token and emits a
//! logit-like score: strongly relevant pairs land around 3-4, unrelated pairs
//! at -2. The 0.3 relevance threshold sits just above a one-term partial
//! match on a short claim.

use claimcheck_domain::text::{content_terms, is_stopword, light_stem, tokenize};
use claimcheck_domain::traits::RelevanceScorer;
use std::collections::HashSet;

/// Score assigned when nothing in the claim is found in the evidence
pub const FLOOR: f64 = -2.0;

const COVERAGE_WEIGHT: f64 = 5.0;
const PHRASE_WEIGHT: f64 = 1.0;
const CUE_BONUS: f64 = 0.5;

/// Words that flip or dispute an assertion
const CONTRADICTION_CUES: &[&str] = &[
    "not",
    "no",
    "never",
    "false",
    "myth",
    "hoax",
    "debunked",
    "incorrect",
    "untrue",
    "contrary",
    "misleading",
    "disproven",
    "doesn",
    "isn",
    "wasn",
];

/// Lexical cross-scorer
///
/// - **Coverage**: share of claim content terms present in the evidence,
///   weighted toward longer (more specific) terms
/// - **Phrase**: share of adjacent claim term pairs that also occur adjacent
///   in the evidence
/// - **Cue**: evidence that matches the claim and carries a negation or
///   debunking cue the claim lacks directly addresses it
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalCrossScorer;

impl LexicalCrossScorer {
    /// Create a scorer
    pub fn new() -> Self {
        Self
    }

    fn term_weight(term: &str) -> f64 {
        1.0 + term.chars().count().min(12) as f64 / 6.0
    }

    fn stems(text: &str) -> Vec<String> {
        content_terms(text)
            .iter()
            .map(|t| light_stem(t).to_string())
            .collect()
    }

    fn has_cue(tokens: &[String]) -> bool {
        tokens.iter().any(|t| CONTRADICTION_CUES.contains(&t.as_str()))
    }
}

impl RelevanceScorer for LexicalCrossScorer {
    fn score(&self, claim: &str, evidence: &str) -> f64 {
        let claim_terms = Self::stems(claim);
        if claim_terms.is_empty() {
            return FLOOR;
        }

        // Evidence side keeps its full order for phrase matching
        let evidence_seq: Vec<String> = tokenize(evidence)
            .iter()
            .map(|t| light_stem(t).to_string())
            .collect();
        let evidence_set: HashSet<&str> = evidence_seq.iter().map(String::as_str).collect();

        let total_weight: f64 = claim_terms.iter().map(|t| Self::term_weight(t)).sum();
        let matched_weight: f64 = claim_terms
            .iter()
            .filter(|t| evidence_set.contains(t.as_str()))
            .map(|t| Self::term_weight(t))
            .sum();
        let coverage = matched_weight / total_weight;
        if coverage == 0.0 {
            return FLOOR;
        }

        let evidence_content: Vec<&str> = evidence_seq
            .iter()
            .map(String::as_str)
            .filter(|t| !is_stopword(t))
            .collect();
        let phrase = if claim_terms.len() < 2 {
            0.0
        } else {
            let pairs = claim_terms.len() - 1;
            let hits = claim_terms
                .windows(2)
                .filter(|pair| {
                    evidence_content
                        .windows(2)
                        .any(|e| e[0] == pair[0] && e[1] == pair[1])
                })
                .count();
            hits as f64 / pairs as f64
        };

        let claim_tokens = tokenize(claim);
        let evidence_tokens = tokenize(evidence);
        let cue = if Self::has_cue(&evidence_tokens) && !Self::has_cue(&claim_tokens) {
            CUE_BONUS
        } else {
            0.0
        };

        FLOOR + COVERAGE_WEIGHT * coverage + PHRASE_WEIGHT * phrase + cue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: &str = "The Earth is an oblate spheroid, not flat. This has been confirmed by satellite imagery, physics, and centuries of scientific observation.";
    const AGE: &str = "The Earth is approximately 4.54 billion years old, based on radiometric dating of meteorite material.";
    const UN: &str = "The United Nations was established on October 24, 1945, after World War II.";

    #[test]
    fn test_direct_contradiction_scores_high() {
        let scorer = LexicalCrossScorer::new();
        let score = scorer.score("The Earth is flat", SHAPE);
        assert!(score > 3.0, "got {}", score);
    }

    #[test]
    fn test_partial_match_scores_between() {
        let scorer = LexicalCrossScorer::new();
        let partial = scorer.score("The Earth is flat", AGE);
        assert!(partial > 0.3 && partial < 1.5, "got {}", partial);
    }

    #[test]
    fn test_unrelated_is_floor() {
        let scorer = LexicalCrossScorer::new();
        assert_eq!(scorer.score("The Earth is flat", UN), FLOOR);
        assert_eq!(scorer.score("", SHAPE), FLOOR);
    }

    #[test]
    fn test_phrase_match_adds() {
        let scorer = LexicalCrossScorer::new();
        let adjacent = scorer.score("climate change", "Climate change is driven by humans.");
        let split = scorer.score("climate change", "Change in the climate is driven by humans.");
        assert!(adjacent > split);
    }

    #[test]
    fn test_deterministic() {
        let scorer = LexicalCrossScorer::new();
        let claim = "Minecraft is a 2D game";
        assert_eq!(scorer.score(claim, AGE), scorer.score(claim, AGE));
    }

    #[test]
    fn test_score_range() {
        let scorer = LexicalCrossScorer::new();
        for (claim, evidence) in [
            ("The Earth is flat", SHAPE),
            ("The Earth is flat", AGE),
            ("The Earth is flat", UN),
            ("earth earth earth", "earth is not earth"),
        ] {
            let s = scorer.score(claim, evidence);
            assert!((FLOOR..=4.5).contains(&s), "{} out of range", s);
        }
    }
}
