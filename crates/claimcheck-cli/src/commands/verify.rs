//! Verify command implementation.

use crate::app::{build_verifier, open_store};
use crate::cli::VerifyArgs;
use crate::config::ClaimcheckConfig;
use crate::error::Result;
use crate::output::Formatter;
use claimcheck_domain::traits::EvidenceStore;
use claimcheck_verifier::VerifyError;

/// Execute the verify command.
pub async fn execute_verify(
    args: VerifyArgs,
    config: &ClaimcheckConfig,
    formatter: &Formatter,
) -> Result<()> {
    let (store, _) = open_store(config)?;
    if store.count()? == 0 {
        eprintln!(
            "{}",
            formatter.info("The evidence store is empty; run 'claimcheck seed' to load the built-in facts")
        );
    }

    let verifier = build_verifier(config, store)?;
    match verifier.verify(&args.claim).await {
        Ok(result) => {
            println!("{}", formatter.format_result(&result, args.trace)?);
            Ok(())
        }
        Err(e) => {
            if let VerifyError::StoreUnavailable { trace, .. } = &e {
                if args.trace {
                    for entry in trace {
                        eprintln!("  {}", entry);
                    }
                }
            }
            Err(e.into())
        }
    }
}
