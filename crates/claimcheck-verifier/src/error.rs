//! Error types for verification

use claimcheck_domain::SessionId;
use std::time::Duration;
use thiserror::Error;

/// System failures that prevent a verification from producing a result
///
/// Missing evidence is never an error; it is the `NotEnoughEvidence` verdict.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The evidence store could not be read
    #[error("Evidence store unavailable: {message}")]
    StoreUnavailable {
        /// Session of the failed call, if the failure happened inside one
        session_id: Option<SessionId>,
        /// Trace accumulated before the failure
        trace: Vec<String>,
        /// Underlying store error
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VerifyError {
    /// Trace recorded before the failure (empty outside a verification)
    pub fn trace(&self) -> &[String] {
        match self {
            VerifyError::StoreUnavailable { trace, .. } => trace,
            VerifyError::Config(_) => &[],
        }
    }
}

/// Failures of a single judgment call
///
/// Always recovered locally by the caller's fallback policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JudgmentError {
    /// Provider returned an error
    #[error("provider error: {0}")]
    Provider(String),

    /// Provider did not answer in time
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Blocking task failed
    #[error("task join error: {0}")]
    Join(String),

    /// Response did not have the expected structure
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for JudgmentError {
    fn from(e: serde_json::Error) -> Self {
        JudgmentError::Malformed(e.to_string())
    }
}
