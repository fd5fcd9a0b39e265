//! Text utilities shared by the embedder and the relevance scorer

/// Common English function words ignored when comparing claim and evidence
pub const STOPWORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "been", "but", "by", "can", "did", "do",
    "does", "for", "from", "had", "has", "have", "he", "her", "his", "i", "if", "in", "into",
    "is", "it", "its", "of", "on", "or", "our", "she", "so", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "to", "was", "we", "were", "what",
    "when", "which", "who", "will", "with", "would", "you", "your",
];

/// Lowercase and split on anything that is not alphanumeric
///
/// # Examples
///
/// ```
/// use claimcheck_domain::text::tokenize;
///
/// assert_eq!(tokenize("Earth's age: 4.54B"), vec!["earth", "s", "age", "4", "54b"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Whether a lowercased token is a stopword
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Fold a trailing plural `s` (`vaccines` -> `vaccine`, but not `glass`)
pub fn light_stem(token: &str) -> &str {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        &token[..token.len() - 1]
    } else {
        token
    }
}

/// Distinct non-stopword tokens in first-seen order
///
/// Single-character tokens are dropped as noise. Falls back to every distinct
/// token when the text consists only of stopwords.
pub fn content_terms(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms: Vec<String> = Vec::new();
    for token in &tokens {
        if token.chars().count() > 1 && !is_stopword(token) && !terms.contains(token) {
            terms.push(token.clone());
        }
    }

    if terms.is_empty() {
        for token in tokens {
            if !terms.contains(&token) {
                terms.push(token);
            }
        }
    }
    terms
}
