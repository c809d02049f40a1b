use std::path::Path;

use crate::commands::common::{format_status_lines, open_store, StatusView};
use crate::error::CliError;

pub async fn run_status(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let store = open_store(db_path).await?;
    let status = store.sync_status().await;
    let login = store.credentials().await.map(|credentials| credentials.login);
    let favorites = store.favorite_ids().await.len();

    if as_json {
        let view = StatusView {
            login,
            favorites,
            status,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_status_lines(&status, login.as_deref(), favorites) {
            println!("{line}");
        }
    }

    Ok(())
}
