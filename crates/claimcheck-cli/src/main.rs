//! claimcheck CLI - Verify claims from the command line.

use anyhow::Context;
use claimcheck_cli::commands;
use claimcheck_cli::{ClaimcheckConfig, Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Filter used with `--verbose` when `RUST_LOG` is unset
const VERBOSE_FILTER: &str = "warn,claimcheck_cli=debug,claimcheck_verifier=debug,\
     claimcheck_search=debug,claimcheck_rerank=debug,claimcheck_store=debug,claimcheck_llm=debug";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ClaimcheckConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    config.apply_env();
    if let Some(db) = cli.db {
        config.store.db_path = Some(db);
    }
    config.validate()?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Verify(args) => commands::execute_verify(args, &config, &formatter).await?,
        Command::Seed => {
            commands::execute_seed(&config, &formatter)?;
        }
        Command::Health => {
            commands::execute_health(&config, &formatter)?;
        }
        Command::Reset(args) => {
            commands::execute_reset(args, &config, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
