//! Evidence deduplication

use claimcheck_domain::EvidenceCandidate;
use std::collections::HashSet;

/// Drop duplicate candidates, keeping the highest-scored of each group
///
/// Two candidates are duplicates when they share a (non-empty) source URL or
/// the same lowercased first 100 characters of text. Candidates are visited
/// in descending score order, input order breaking ties; the first one seen
/// wins.
pub fn deduplicate(mut candidates: Vec<EvidenceCandidate>) -> Vec<EvidenceCandidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_texts: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let url = candidate.source_url.trim().to_string();
        let text_key = candidate.dedup_key();
        if (!url.is_empty() && seen_urls.contains(&url)) || seen_texts.contains(&text_key) {
            continue;
        }
        if !url.is_empty() {
            seen_urls.insert(url);
        }
        seen_texts.insert(text_key);
        unique.push(candidate);
    }
    unique
}
