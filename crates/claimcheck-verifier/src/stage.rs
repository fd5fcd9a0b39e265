//! Pipeline stages and the trace log

use std::fmt;

/// Stage of one verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Deciding whether the claim is checkable
    Classifying,
    /// Querying the evidence store
    Retrieving,
    /// Deciding whether stored evidence is enough
    CheckingSufficiency,
    /// Searching trusted news outlets
    SearchTrusted,
    /// Searching fact-checking sites
    SearchFactCheckers,
    /// Searching the open web
    SearchBroad,
    /// Removing duplicate evidence
    Deduplicating,
    /// Credibility-aware ranking of the evidence union
    FinalRerank,
    /// Producing the verdict
    Synthesizing,
    /// Finished
    Done,
}

/// What happened in the current stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move on along the main path
    Proceed,
    /// Stop early (opinion or ambiguous claim)
    ShortCircuit,
    /// Evidence so far is enough
    Sufficient,
    /// Evidence so far is not enough
    Insufficient,
}

impl Stage {
    /// Next stage after `transition`
    ///
    /// Transitions that make no sense for a stage leave it unchanged.
    pub fn next(self, transition: Transition) -> Stage {
        use Stage::*;
        use Transition::*;

        match (self, transition) {
            (Classifying, ShortCircuit) => Done,
            (Classifying, _) => Retrieving,
            (Retrieving, _) => CheckingSufficiency,
            (CheckingSufficiency, Sufficient) => Deduplicating,
            (CheckingSufficiency, _) => SearchTrusted,
            (SearchTrusted, _) => SearchFactCheckers,
            (SearchFactCheckers, Insufficient) => SearchBroad,
            (SearchFactCheckers, _) => Deduplicating,
            (SearchBroad, _) => Deduplicating,
            (Deduplicating, _) => FinalRerank,
            (FinalRerank, _) => Synthesizing,
            (Synthesizing, _) => Done,
            (Done, _) => Done,
        }
    }

    /// Stage name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Classifying => "Classifying",
            Stage::Retrieving => "Retrieving",
            Stage::CheckingSufficiency => "CheckingSufficiency",
            Stage::SearchTrusted => "SearchTrusted",
            Stage::SearchFactCheckers => "SearchFactCheckers",
            Stage::SearchBroad => "SearchBroad",
            Stage::Deduplicating => "Deduplicating",
            Stage::FinalRerank => "FinalRerank",
            Stage::Synthesizing => "Synthesizing",
            Stage::Done => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, human-readable record of one verification
#[derive(Debug, Clone)]
pub struct Trace {
    stage: Stage,
    entries: Vec<String>,
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

impl Trace {
    /// Empty trace positioned at [`Stage::Classifying`]
    pub fn new() -> Self {
        Self {
            stage: Stage::Classifying,
            entries: Vec::new(),
        }
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Append an entry tagged with the current stage
    pub fn record(&mut self, entry: impl AsRef<str>) {
        self.entries.push(format!("[{}] {}", self.stage, entry.as_ref()));
    }

    /// Move to the next stage and log the transition
    pub fn advance(&mut self, transition: Transition) -> Stage {
        let next = self.stage.next(transition);
        if next != self.stage {
            self.entries.push(format!("{} -> {}", self.stage, next));
            self.stage = next;
        }
        next
    }

    /// Entries so far
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Consume the trace
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}
