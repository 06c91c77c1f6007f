//! Loading the ledger snapshot a request points at.

use std::path::PathBuf;

use anyhow::{Context, Result};
use stakecal_core::ledger::memory::LedgerSnapshot;
use stakecal_core::ledger::protocol::ProviderParams;

/// Ledger param naming the snapshot file.
pub const FIXTURE_PATH_PARAM: &str = "fixture_path";

pub fn fixture_path(params: &ProviderParams) -> Result<PathBuf> {
    let raw = params
        .get(FIXTURE_PATH_PARAM)
        .and_then(|v| v.as_str())
        .with_context(|| format!("Missing '{FIXTURE_PATH_PARAM}' in ledger config"))?;

    Ok(PathBuf::from(shellexpand::tilde(raw).into_owned()))
}

/// Snapshots are re-read on every request so edits show up immediately.
pub fn load(params: &ProviderParams) -> Result<LedgerSnapshot> {
    let path = fixture_path(params)?;
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read fixture {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Invalid fixture {}", path.display()))
}
