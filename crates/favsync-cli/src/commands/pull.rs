use std::path::Path;

use crate::commands::common::open_orchestrator;
use crate::error::CliError;

/// Adopt remote-only favorites locally. The remote document is left untouched.
pub async fn run_pull(db_path: &Path, profile: Option<&str>) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(db_path, profile).await?;
    if !orchestrator.store().is_sync_enabled().await {
        return Err(CliError::SyncNotConfigured);
    }

    let before = orchestrator.store().favorite_ids().await.len();
    let merged = orchestrator.merged_favorite_ids().await?;
    let stored = orchestrator.store().set_favorite_ids(&merged).await?;

    let added = stored.len().saturating_sub(before);
    println!("Pulled {added} favorite(s); {} total", stored.len());
    Ok(())
}
