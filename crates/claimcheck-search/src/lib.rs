//! Web evidence search
//!
//! Escalating web searches (trusted news, then fact-checkers, then the open
//! web) whose results are written back into the evidence store so later
//! verifications can find them locally.
//!
//! # Backends
//!
//! - [`SerperBackend`]: Serper.dev Google search over HTTP
//! - [`StaticBackend`]: scripted results for tests and offline runs
//!
//! Any other engine plugs in through [`WebSearchBackend`].

pub mod backend;
pub mod config;
pub mod error;
pub mod provider;
pub mod serper;

pub use backend::{SearchHit, SearchRequest, StaticBackend, WebSearchBackend};
pub use config::SearchConfig;
pub use error::SearchError;
pub use provider::{SearchStage, WebEvidenceProvider};
pub use serper::SerperBackend;
