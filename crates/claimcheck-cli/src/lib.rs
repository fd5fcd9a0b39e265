//! claimcheck CLI library.
//!
//! Configuration loading, component wiring, command execution and output
//! formatting for the `claimcheck` binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::ClaimcheckConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
