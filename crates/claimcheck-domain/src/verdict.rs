//! Verdict module - the output of a verification call

use crate::claim::ClaimType;
use crate::evidence::EvidenceCandidate;
use std::fmt;

/// Six-way truth status of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Evidence supports the claim
    True,
    /// Evidence contradicts the claim
    False,
    /// Some parts are supported, others are not
    PartiallyTrue,
    /// Technically accurate but presented in a misleading way
    Misleading,
    /// Nothing relevant enough to decide
    NotEnoughEvidence,
    /// Opinion or value judgment; evidence cannot settle it
    NotVerifiable,
}

impl Verdict {
    /// Human-readable label, also the form requested from the synthesizer
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::True => "True",
            Verdict::False => "False",
            Verdict::PartiallyTrue => "Partially True",
            Verdict::Misleading => "Misleading",
            Verdict::NotEnoughEvidence => "Not Enough Evidence",
            Verdict::NotVerifiable => "Not Verifiable",
        }
    }

    /// Parse a verdict label
    ///
    /// Case, spaces, underscores and hyphens are ignored, so `"Partially True"`,
    /// `"PARTIALLY_TRUE"` and `"partially-true"` all parse.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "true" => Some(Verdict::True),
            "false" => Some(Verdict::False),
            "partiallytrue" => Some(Verdict::PartiallyTrue),
            "misleading" => Some(Verdict::Misleading),
            "notenoughevidence" => Some(Verdict::NotEnoughEvidence),
            "notverifiable" => Some(Verdict::NotVerifiable),
            _ => None,
        }
    }

    /// Whether the verdict asserts something about the claim's truth
    pub fn is_substantive(&self) -> bool {
        !matches!(self, Verdict::NotEnoughEvidence | Verdict::NotVerifiable)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of one verification call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u128);

impl SessionId {
    /// Generate a fresh session id (UUIDv7, time-ordered)
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Complete outcome of one verification call
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    /// Normalized claim that was actually checked
    pub claim: String,

    /// Raw user input
    pub original_claim: String,

    /// Classification assigned to the input
    pub classification: ClaimType,

    /// Final verdict
    pub verdict: Verdict,

    /// Confidence in [0, 1]
    pub confidence: f64,

    /// Explanation with `[n]` markers into `evidence` (1-based)
    pub reasoning: String,

    /// Evidence shown to the synthesizer, in citation order
    pub evidence: Vec<EvidenceCandidate>,

    /// Ordered, human-readable pipeline decisions
    pub trace: Vec<String>,

    /// Unique id of this call
    pub session_id: SessionId,
}

impl VerificationResult {
    /// Citation indices in `reasoning` that do not point into `evidence`
    pub fn dangling_citations(&self) -> Vec<usize> {
        citation_indices(&self.reasoning)
            .into_iter()
            .filter(|n| *n == 0 || *n > self.evidence.len())
            .collect()
    }
}

/// Store statistics exposed for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Number of stored evidence documents
    pub document_count: usize,
}

/// Extract every `[n]` citation marker from a text, in order of appearance
///
/// Comma-separated groups such as `[1, 3]` yield each number. Brackets that
/// do not contain only numbers are ignored.
///
/// # Examples
///
/// ```
/// use claimcheck_domain::verdict::citation_indices;
///
/// assert_eq!(citation_indices("NASA [1] and [2, 3] say so [see above]"), vec![1, 2, 3]);
/// ```
pub fn citation_indices(text: &str) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            break;
        };
        let inner = &after[..close];
        let parsed: Option<Vec<usize>> = inner
            .split(',')
            .map(|part| part.trim().parse::<usize>().ok())
            .collect();
        match parsed {
            Some(numbers) => {
                indices.extend(numbers);
                rest = &after[close + 1..];
            }
            // Rescan from just past this bracket so nested groups like `[[7]]` are seen
            None => rest = after,
        }
    }
    indices
}
