//! Reset command implementation.

use crate::app::open_store;
use crate::cli::ResetArgs;
use crate::config::ClaimcheckConfig;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the reset command.
///
/// Returns the number of documents removed.
pub fn execute_reset(
    args: ResetArgs,
    config: &ClaimcheckConfig,
    formatter: &Formatter,
) -> Result<usize> {
    if !args.yes {
        return Err(CliError::InvalidInput(
            "reset deletes every stored document; pass --yes to confirm".to_string(),
        ));
    }

    let (store, _) = open_store(config)?;
    let removed = store.reset()?;
    println!("{}", formatter.format_count("Removed", removed)?);
    Ok(removed)
}
