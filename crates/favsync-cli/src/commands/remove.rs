use std::collections::HashSet;
use std::path::Path;

use favsync_core::FavoriteId;

use crate::commands::common::{open_store, parse_id_arguments};
use crate::error::CliError;

pub async fn run_remove(ids: &[String], db_path: &Path) -> Result<(), CliError> {
    let requested = parse_id_arguments(ids)?;
    let store = open_store(db_path).await?;

    let before = store.favorite_ids().await;
    let remaining = retain_unlisted(&before, &requested);
    let stored = store.set_favorite_ids(&remaining).await?;

    let removed = before.len().saturating_sub(stored.len());
    println!("Removed {removed} favorite(s); {} total", stored.len());
    Ok(())
}

/// Removal only touches the local list; the next sync drops the IDs remotely.
pub fn retain_unlisted(current: &[FavoriteId], removed: &[FavoriteId]) -> Vec<FavoriteId> {
    let removed = removed.iter().collect::<HashSet<_>>();
    current
        .iter()
        .filter(|id| !removed.contains(id))
        .cloned()
        .collect()
}
