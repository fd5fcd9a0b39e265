//! Store-management commands against an on-disk database

use claimcheck_cli::app::open_store;
use claimcheck_cli::cli::ResetArgs;
use claimcheck_cli::commands::{execute_health, execute_reset, execute_seed};
use claimcheck_cli::config::OutputFormat;
use claimcheck_cli::{ClaimcheckConfig, CliError, Formatter};
use claimcheck_domain::traits::EvidenceStore;
use claimcheck_store::seed::seed_facts;
use tempfile::{tempdir, TempDir};

fn setup() -> (TempDir, ClaimcheckConfig, Formatter) {
    let dir = tempdir().unwrap();
    let mut config = ClaimcheckConfig::default();
    config.store.db_path = Some(dir.path().join("evidence.db"));
    (dir, config, Formatter::new(OutputFormat::Json, false))
}

#[test]
fn test_seed_only_fills_an_empty_store() {
    let (_dir, config, formatter) = setup();

    assert_eq!(execute_seed(&config, &formatter).unwrap(), seed_facts().len());
    assert_eq!(execute_seed(&config, &formatter).unwrap(), 0);

    let health = execute_health(&config, &formatter).unwrap();
    assert_eq!(health.document_count, seed_facts().len());
}

#[test]
fn test_seeded_store_is_searchable_after_reopen() {
    let (_dir, config, formatter) = setup();
    execute_seed(&config, &formatter).unwrap();

    // The vector index is rebuilt from the database on open
    let (store, _) = open_store(&config).unwrap();
    let hits = store.query("Is the Earth flat?", 3).unwrap();
    assert!(!hits.is_empty());
    assert!(hits[0].document.text.contains("oblate spheroid"));
}

#[test]
fn test_reset_requires_confirmation() {
    let (_dir, config, formatter) = setup();
    execute_seed(&config, &formatter).unwrap();

    let refused = execute_reset(ResetArgs { yes: false }, &config, &formatter);
    assert!(matches!(refused, Err(CliError::InvalidInput(_))));
    assert_eq!(
        execute_health(&config, &formatter).unwrap().document_count,
        seed_facts().len()
    );

    let removed = execute_reset(ResetArgs { yes: true }, &config, &formatter).unwrap();
    assert_eq!(removed, seed_facts().len());
    assert_eq!(execute_health(&config, &formatter).unwrap().document_count, 0);
}

#[test]
fn test_health_on_fresh_database() {
    let (dir, config, formatter) = setup();
    let health = execute_health(&config, &formatter).unwrap();
    assert_eq!(health.document_count, 0);
    assert!(dir.path().join("evidence.db").exists());
}
