//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// claimcheck - Verify factual claims against stored and web evidence.
#[derive(Debug, Parser)]
#[command(name = "claimcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.claimcheck/config.toml)
    #[arg(short, long, global = true, env = "CLAIMCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Evidence database path, overriding the configuration file
    #[arg(long, global = true, env = "CLAIMCHECK_DB")]
    pub db: Option<PathBuf>,

    /// Log pipeline internals to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify a claim
    Verify(VerifyArgs),

    /// Load the built-in facts into an empty store
    Seed,

    /// Show store statistics
    Health,

    /// Delete every stored evidence document
    Reset(ResetArgs),
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// The claim to check
    pub claim: String,

    /// Print the pipeline trace after the verdict
    #[arg(short, long)]
    pub trace: bool,
}

/// Arguments for the reset command.
#[derive(Debug, Parser)]
pub struct ResetArgs {
    /// Skip the confirmation check
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verify() {
        let cli = Cli::parse_from(["claimcheck", "verify", "The Earth is flat", "--trace"]);
        match cli.command {
            Command::Verify(args) => {
                assert_eq!(args.claim, "The Earth is flat");
                assert!(args.trace);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["claimcheck", "health", "--format", "json", "--db", "/tmp/x.db"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Command::Health));
    }

    #[test]
    fn test_verify_requires_claim() {
        assert!(Cli::try_parse_from(["claimcheck", "verify"]).is_err());
    }
}
