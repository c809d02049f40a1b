use std::path::Path;

use crate::commands::common::{open_store, parse_id_arguments};
use crate::error::CliError;

pub async fn run_add(ids: &[String], db_path: &Path) -> Result<(), CliError> {
    let requested = parse_id_arguments(ids)?;
    let store = open_store(db_path).await?;

    let before = store.favorite_ids().await;
    let stored = store
        .set_favorite_ids(before.iter().chain(requested.iter()))
        .await?;

    let added = stored.len().saturating_sub(before.len());
    println!("Added {added} favorite(s); {} total", stored.len());
    Ok(())
}
