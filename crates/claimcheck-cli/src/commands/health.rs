//! Health command implementation.

use crate::app::{build_verifier, open_store};
use crate::config::ClaimcheckConfig;
use crate::error::Result;
use crate::output::Formatter;
use claimcheck_domain::Health;

/// Execute the health command.
pub fn execute_health(config: &ClaimcheckConfig, formatter: &Formatter) -> Result<Health> {
    let (store, path) = open_store(config)?;
    let verifier = build_verifier(config, store)?;
    let health = verifier.health()?;

    println!(
        "{}",
        formatter.format_health(&health, &path.display().to_string())?
    );
    Ok(health)
}
