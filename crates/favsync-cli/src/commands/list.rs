use std::path::Path;

use crate::commands::common::open_store;
use crate::error::CliError;

pub async fn run_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let ids = store.favorite_ids().await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&ids)?);
    } else if ids.is_empty() {
        println!("No favorites yet.");
    } else {
        for id in ids {
            println!("{id}");
        }
    }

    Ok(())
}
