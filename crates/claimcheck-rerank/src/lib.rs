//! Evidence reranking
//!
//! Scores each candidate jointly against the claim, applies the relevance
//! gate, and for the final pass folds in source credibility and domain
//! diversity.
//!
//! # Ordering
//!
//! [`Reranker::rerank_with_credibility`] sorts on the credibility-adjusted
//! score but filters on the raw relevance. A low-relevance result from a
//! highly credible domain never passes the gate on credibility alone.
//!
//! # Examples
//!
//! ```
//! use claimcheck_domain::{EvidenceCandidate, Origin};
//! use claimcheck_rerank::Reranker;
//!
//! let reranker = Reranker::default();
//! let candidates = vec![
//!     EvidenceCandidate::from_web(
//!         "The Earth is an oblate spheroid, not flat.",
//!         "https://www.nasa.gov/earth",
//!         Origin::Kb,
//!         None,
//!     ),
//!     EvidenceCandidate::from_web(
//!         "The United Nations was established in 1945.",
//!         "https://www.un.org/en/about-us",
//!         Origin::Kb,
//!         None,
//!     ),
//! ];
//!
//! let ranked = reranker.rerank("The Earth is flat", candidates, 5);
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].domain, "nasa.gov");
//! ```

pub mod config;
pub mod scorer;

pub use config::RerankConfig;
pub use scorer::LexicalCrossScorer;

use claimcheck_domain::credibility::DEFAULT_CREDIBILITY;
use claimcheck_domain::traits::RelevanceScorer;
use claimcheck_domain::EvidenceCandidate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Cross-scoring reranker with credibility and diversity rules
#[derive(Clone)]
pub struct Reranker {
    scorer: Arc<dyn RelevanceScorer>,
    config: RerankConfig,
}

impl Default for Reranker {
    fn default() -> Self {
        Self::new(RerankConfig::default())
    }
}

impl Reranker {
    /// Reranker backed by [`LexicalCrossScorer`]
    pub fn new(config: RerankConfig) -> Self {
        Self::with_scorer(Arc::new(LexicalCrossScorer::new()), config)
    }

    /// Reranker with a custom relevance scorer
    pub fn with_scorer(scorer: Arc<dyn RelevanceScorer>, config: RerankConfig) -> Self {
        Self { scorer, config }
    }

    /// Active configuration
    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Raw relevance of one piece of evidence to the claim
    pub fn relevance(&self, claim: &str, evidence: &str) -> f64 {
        self.scorer.score(claim, evidence)
    }

    /// Whether a raw relevance passes the gate
    pub fn is_relevant(&self, relevance: f64) -> bool {
        relevance >= self.config.min_relevance
    }

    /// Sort by relevance, drop everything below the gate, keep `top_k`
    ///
    /// Each returned candidate has `relevance` set and `score` replaced by
    /// that relevance.
    pub fn rerank(
        &self,
        claim: &str,
        candidates: Vec<EvidenceCandidate>,
        top_k: usize,
    ) -> Vec<EvidenceCandidate> {
        let total = candidates.len();
        let mut scored: Vec<EvidenceCandidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                let relevance = self.relevance(claim, &candidate.text);
                candidate.relevance = Some(relevance);
                candidate.score = relevance;
                candidate
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.retain(|c| self.is_relevant(c.score));
        scored.truncate(top_k);

        debug!(total, kept = scored.len(), "Reranked candidates");
        scored
    }

    /// Credibility-aware final ranking
    ///
    /// `final = relevance + (credibility - 0.5) * credibility_boost_factor`.
    /// Candidates are sorted by final score, gated on raw relevance, limited
    /// to `max_per_domain` per domain, then truncated to `top_k`.
    pub fn rerank_with_credibility(
        &self,
        claim: &str,
        candidates: Vec<EvidenceCandidate>,
        top_k: usize,
    ) -> Vec<EvidenceCandidate> {
        let total = candidates.len();
        let factor = self.config.credibility_boost_factor;
        let mut scored: Vec<EvidenceCandidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                let relevance = self.relevance(claim, &candidate.text);
                let boost = (candidate.credibility - DEFAULT_CREDIBILITY) * factor;
                let final_score = relevance + boost;
                candidate.relevance = Some(relevance);
                candidate.final_score = Some(final_score);
                candidate.score = final_score;
                candidate
            })
            .collect();

        // Stable: equal final scores keep their input order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut per_domain: HashMap<String, usize> = HashMap::new();
        let mut kept = Vec::new();
        for candidate in scored {
            let relevance = candidate.relevance.unwrap_or(f64::NEG_INFINITY);
            if !self.is_relevant(relevance) {
                continue;
            }
            let seen = per_domain.entry(candidate.domain.clone()).or_insert(0);
            if *seen >= self.config.max_per_domain {
                continue;
            }
            *seen += 1;
            kept.push(candidate);
            if kept.len() == top_k {
                break;
            }
        }

        debug!(total, kept = kept.len(), "Credibility rerank");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_domain::{Origin, SourceType};
    use std::collections::HashMap as Map;

    /// Scorer returning fixed relevance per evidence text
    struct Scripted(Map<&'static str, f64>);

    impl RelevanceScorer for Scripted {
        fn score(&self, _claim: &str, evidence: &str) -> f64 {
            self.0.get(evidence).copied().unwrap_or(-2.0)
        }
    }

    fn candidate(text: &str, domain: &str, credibility: f64) -> EvidenceCandidate {
        EvidenceCandidate {
            evidence_id: None,
            text: text.to_string(),
            source_url: format!("https://{}/{}", domain, text),
            domain: domain.to_string(),
            source_type: SourceType::Unknown,
            credibility,
            origin: Origin::Kb,
            score: 0.0,
            relevance: None,
            final_score: None,
        }
    }

    fn scripted(pairs: &[(&'static str, f64)]) -> Reranker {
        Reranker::with_scorer(
            Arc::new(Scripted(pairs.iter().copied().collect())),
            RerankConfig::default(),
        )
    }

    #[test]
    fn test_rerank_sorts_filters_and_truncates() {
        let reranker = scripted(&[("a", 0.5), ("b", 2.0), ("c", 0.1), ("d", 1.0)]);
        let ranked = reranker.rerank(
            "claim",
            vec![
                candidate("a", "a.com", 0.5),
                candidate("b", "b.com", 0.5),
                candidate("c", "c.com", 0.5),
                candidate("d", "d.com", 0.5),
            ],
            2,
        );
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "d"]);
        assert_eq!(ranked[0].relevance, Some(2.0));
        assert_eq!(ranked[0].score, 2.0);
    }

    #[test]
    fn test_rerank_all_below_threshold_is_empty() {
        let reranker = scripted(&[("a", 0.29), ("b", -1.0)]);
        let ranked = reranker.rerank(
            "claim",
            vec![candidate("a", "a.com", 0.5), candidate("b", "b.com", 0.5)],
            5,
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let reranker = scripted(&[("a", 0.3)]);
        assert_eq!(reranker.rerank("claim", vec![candidate("a", "a.com", 0.5)], 5).len(), 1);
    }

    #[test]
    fn test_filter_on_raw_sort_on_boosted() {
        // "low" falls under the gate even though credibility lifts it above 0.3
        // "credible" outranks "plain" only because of the boost
        let reranker = scripted(&[("low", 0.2), ("plain", 1.0), ("credible", 0.9)]);
        let ranked = reranker.rerank_with_credibility(
            "claim",
            vec![
                candidate("low", "nasa.gov", 1.0),
                candidate("plain", "blog.example", 0.5),
                candidate("credible", "reuters.com", 0.95),
            ],
            5,
        );

        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["credible", "plain"]);
        let credible = &ranked[0];
        assert_eq!(credible.relevance, Some(0.9));
        assert!((credible.final_score.unwrap() - (0.9 + 0.45 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn test_domain_diversity_cap() {
        let reranker = scripted(&[("n1", 3.0), ("n2", 2.9), ("n3", 2.8), ("o1", 1.0)]);
        let ranked = reranker.rerank_with_credibility(
            "claim",
            vec![
                candidate("n1", "nasa.gov", 0.98),
                candidate("n2", "nasa.gov", 0.98),
                candidate("n3", "nasa.gov", 0.98),
                candidate("o1", "who.int", 0.95),
            ],
            5,
        );
        let texts: Vec<&str> = ranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["n1", "n2", "o1"]);
    }

    #[test]
    fn test_empty_domain_is_its_own_bucket() {
        let reranker = scripted(&[("x", 1.0), ("y", 1.0), ("z", 1.0)]);
        let ranked = reranker.rerank_with_credibility(
            "claim",
            vec![candidate("x", "", 0.5), candidate("y", "", 0.5), candidate("z", "", 0.5)],
            5,
        );
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_stable_on_ties() {
        let reranker = scripted(&[("first", 1.0), ("second", 1.0)]);
        let ranked = reranker.rerank_with_credibility(
            "claim",
            vec![candidate("first", "a.com", 0.5), candidate("second", "b.com", 0.5)],
            5,
        );
        assert_eq!(ranked[0].text, "first");
    }

    #[test]
    fn test_relevance_gate_is_inclusive() {
        let reranker = Reranker::default();
        assert!(reranker.is_relevant(0.3));
        assert!(!reranker.is_relevant(0.29));
        assert!(!reranker.is_relevant(-1.5));
    }

    #[test]
    fn test_default_scorer_prefers_on_topic_evidence() {
        let reranker = Reranker::default();
        let ranked = reranker.rerank(
            "The Earth is flat",
            vec![
                EvidenceCandidate::from_web(
                    "The Earth is approximately 4.54 billion years old.",
                    "https://www.nasa.gov/age",
                    Origin::Kb,
                    None,
                ),
                EvidenceCandidate::from_web(
                    "The Earth is an oblate spheroid, not flat.",
                    "https://www.nasa.gov/shape",
                    Origin::Kb,
                    None,
                ),
            ],
            5,
        );
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].text.contains("spheroid"));
    }
}
