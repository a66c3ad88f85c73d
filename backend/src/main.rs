use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chore_ledger::config::LedgerConfig;
use chore_ledger::initialize_backend;

const DEFAULT_CONFIG_FILE: &str = "ledger_config.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = LedgerConfig::load(&config_path)?.with_env_overrides()?;
    info!(
        "Using data directory {:?} (family existence enforced: {})",
        config.data_directory, config.enforce_family_exists
    );

    let state = initialize_backend(&config)
        .await
        .with_context(|| format!("Failed to open ledger at {:?}", config.ledger_path()))?;

    let document = state.store.snapshot();
    info!(
        "Ledger ready at {:?}: {} users, {} chores, {} rewards, {} completions, {} redemptions",
        state.store.path(),
        document.users.len(),
        document.chores.len(),
        document.rewards.len(),
        document.completed_chores.len(),
        document.redeemed_rewards.len()
    );

    Ok(())
}
