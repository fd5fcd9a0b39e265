//! Evidence module - stored documents and per-call candidates

use crate::credibility;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU16, Ordering};

/// Per-process counter mixed into ids so identical text inserted within the
/// same millisecond still gets distinct ids.
static ID_SEQUENCE: AtomicU16 = AtomicU16::new(0);

/// Number of leading characters compared when deduplicating by text
pub const DEDUP_PREFIX_CHARS: usize = 100;

/// Unique identifier for an evidence document
///
/// Laid out as a UUIDv7: the top 48 bits carry the insertion time in
/// milliseconds, the remaining random bits are filled from a hash of the
/// document text. Uniqueness matters here, not secrecy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvidenceId(u128);

impl EvidenceId {
    /// Derive an id from the document text and its insertion time
    ///
    /// # Examples
    ///
    /// ```
    /// use claimcheck_domain::EvidenceId;
    ///
    /// let id = EvidenceId::derive("The Earth is an oblate spheroid.", 1_700_000_000_000);
    /// assert_eq!(id.timestamp_millis(), 1_700_000_000_000);
    /// ```
    pub fn derive(text: &str, inserted_at_millis: u64) -> Self {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let digest = hasher.finish().to_be_bytes();
        let sequence = ID_SEQUENCE.fetch_add(1, Ordering::Relaxed).to_be_bytes();

        let mut tail = [0u8; 10];
        tail[..2].copy_from_slice(&sequence);
        tail[2..].copy_from_slice(&digest);

        let uuid = uuid::Builder::from_unix_timestamp_millis(inserted_at_millis, &tail).into_uuid();
        Self(uuid.as_u128())
    }

    /// Create an EvidenceId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EvidenceId from its UUID string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid evidence id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Insertion time encoded in the id (milliseconds since Unix epoch)
    pub fn timestamp_millis(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Kind of publisher behind an evidence source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    /// News organisation
    News,
    /// Academic publisher or university
    Academic,
    /// Dedicated fact-checking outlet
    FactChecker,
    /// Government or intergovernmental scientific body
    Government,
    /// Anything else
    Unknown,
}

impl SourceType {
    /// Get the storage label
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::News => "news",
            SourceType::Academic => "academic",
            SourceType::FactChecker => "fact_checker",
            SourceType::Government => "government",
            SourceType::Unknown => "unknown",
        }
    }

    /// Parse a storage label; unrecognised labels map to `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "news" => SourceType::News,
            "academic" => SourceType::Academic,
            "fact_checker" | "fact-checker" | "factchecker" => SourceType::FactChecker,
            "government" => SourceType::Government,
            _ => SourceType::Unknown,
        }
    }
}

/// Where a candidate came from during one verification call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Local evidence store
    Kb,
    /// Web search restricted to trusted news domains
    WebTrusted,
    /// Web search restricted to fact-checking domains
    WebFactCheck,
    /// Unrestricted web search
    WebBroad,
}

impl Origin {
    /// Get the origin tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Kb => "kb",
            Origin::WebTrusted => "web_trusted",
            Origin::WebFactCheck => "web_fact_check",
            Origin::WebBroad => "web_broad",
        }
    }

    /// Whether the candidate came from a web search tier
    pub fn is_web(&self) -> bool {
        !matches!(self, Origin::Kb)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored evidence document
///
/// Text and embedding never change after insertion. Only `access_count`
/// and `last_accessed_at` move, and `access_count` only ever goes up.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceDocument {
    /// Unique identifier
    pub id: EvidenceId,

    /// Short atomic snippet (1-3 sentences)
    pub text: String,

    /// Dense embedding of `text`
    pub embedding: Vec<f32>,

    /// Source URL as given at insertion
    pub source_url: String,

    /// Host of `source_url`, lowercased, without `www.`
    pub domain: String,

    /// Publisher category
    pub source_type: SourceType,

    /// Domain credibility in [0, 1]
    pub credibility: f64,

    /// Title or description of the source
    pub details: String,

    /// Number of queries in which this document cleared the relevance gate
    pub access_count: u64,

    /// Insertion time (seconds since Unix epoch)
    pub inserted_at: u64,

    /// Last time the document cleared the relevance gate
    pub last_accessed_at: Option<u64>,
}

/// Input for inserting a new document
///
/// Only `text` and `source_url` are required; everything else takes a
/// documented default when missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewEvidence {
    /// Snippet text
    pub text: String,

    /// Source URL (may be empty)
    pub source_url: String,

    /// Title or description (defaults to empty)
    pub details: String,

    /// Publisher category (inferred from the domain when `None`)
    pub source_type: Option<SourceType>,

    /// Insertion time in seconds (defaults to now)
    pub timestamp: Option<u64>,
}

impl NewEvidence {
    /// Create a new document input
    pub fn new(text: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_url: source_url.into(),
            ..Default::default()
        }
    }

    /// Set the title/description
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Set an explicit source type
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = Some(source_type);
        self
    }

    /// Set an explicit insertion timestamp (seconds since Unix epoch)
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A document returned from a store query with its scores
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEvidence {
    /// The stored document
    pub document: EvidenceDocument,

    /// Raw cosine similarity to the query
    pub similarity: f64,

    /// Similarity plus the popularity boost; results are sorted by this
    pub score: f64,
}

/// A piece of evidence under consideration during one verification call
///
/// Candidates are never persisted. `score` always holds the most recent
/// ranking score (retrieval, then relevance, then final score).
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceCandidate {
    /// Stored document id, when the evidence is (or was written to) the store
    pub evidence_id: Option<EvidenceId>,

    /// Snippet text
    pub text: String,

    /// Source URL
    pub source_url: String,

    /// Host of `source_url`
    pub domain: String,

    /// Publisher category
    pub source_type: SourceType,

    /// Domain credibility in [0, 1]
    pub credibility: f64,

    /// Where this candidate came from
    pub origin: Origin,

    /// Current ranking score
    pub score: f64,

    /// Cross-attention relevance (set by the reranker)
    pub relevance: Option<f64>,

    /// Relevance plus credibility adjustment (set by credibility reranking)
    pub final_score: Option<f64>,
}

impl EvidenceCandidate {
    /// Build a knowledge-base candidate from a store query hit
    pub fn from_scored(hit: &ScoredEvidence) -> Self {
        let doc = &hit.document;
        Self {
            evidence_id: Some(doc.id),
            text: doc.text.clone(),
            source_url: doc.source_url.clone(),
            domain: doc.domain.clone(),
            source_type: doc.source_type,
            credibility: doc.credibility,
            origin: Origin::Kb,
            score: hit.score,
            relevance: None,
            final_score: None,
        }
    }

    /// Build a candidate from a web search snippet
    pub fn from_web(
        text: impl Into<String>,
        source_url: impl Into<String>,
        origin: Origin,
        evidence_id: Option<EvidenceId>,
    ) -> Self {
        let source_url = source_url.into();
        let domain = credibility::extract_domain(&source_url);
        Self {
            evidence_id,
            text: text.into(),
            credibility: credibility::credibility_for(&domain),
            source_type: credibility::infer_source_type(&domain),
            domain,
            source_url,
            origin,
            score: 0.0,
            relevance: None,
            final_score: None,
        }
    }

    /// Lowercased text prefix used for near-duplicate detection
    pub fn dedup_key(&self) -> String {
        self.text
            .chars()
            .take(DEDUP_PREFIX_CHARS)
            .collect::<String>()
            .to_lowercase()
    }
}
