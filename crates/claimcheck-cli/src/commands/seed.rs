//! Seed command implementation.

use crate::app::open_store;
use crate::config::ClaimcheckConfig;
use crate::error::Result;
use crate::output::Formatter;
use claimcheck_domain::traits::EvidenceStore;
use claimcheck_store::seed::seed_if_empty;

/// Execute the seed command.
///
/// Returns the number of documents inserted.
pub fn execute_seed(config: &ClaimcheckConfig, formatter: &Formatter) -> Result<usize> {
    let (store, _) = open_store(config)?;
    let inserted = seed_if_empty(store.as_ref())?;

    if inserted == 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "Store already holds {} document(s); nothing seeded",
                store.count()?
            ))
        );
    }
    println!("{}", formatter.format_count("Seeded", inserted)?);
    Ok(inserted)
}
