use std::path::Path;

use favsync_core::merge_favorite_ids;

use crate::commands::common::{format_remote_item_lines, open_orchestrator, remote_view};
use crate::error::CliError;

pub async fn run_remote(as_json: bool, db_path: &Path, profile: Option<&str>) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(db_path, profile).await?;
    if !orchestrator.store().is_sync_enabled().await {
        return Err(CliError::SyncNotConfigured);
    }

    let handle = orchestrator.fetch_remote_for_current_user().await?;
    let local = orchestrator.store().favorite_ids().await;
    let merged = merge_favorite_ids(&local, handle.items());

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&remote_view(&handle, &merged))?
        );
        return Ok(());
    }

    if !handle.exists {
        println!("No remote favorites document yet.");
    } else if handle.document.is_none() {
        println!("Remote favorites document is unreadable; the next sync replaces it.");
    } else if handle.items().is_empty() {
        println!("Remote favorites document is empty.");
    } else {
        for line in format_remote_item_lines(handle.items()) {
            println!("{line}");
        }
    }

    let remote_only = merged.len().saturating_sub(local.len());
    if remote_only > 0 {
        println!("{remote_only} remote favorite(s) not in the local list. Run `favsync pull` to add them.");
    }
    Ok(())
}
