use std::path::Path;

use favsync_core::{SyncOptions, SyncOutcome};

use crate::commands::common::{format_timestamp, load_metadata_file, open_orchestrator};
use crate::error::CliError;

pub async fn run_sync(
    metadata_path: Option<&Path>,
    db_path: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let metadata = match metadata_path {
        Some(path) => load_metadata_file(path)?,
        None => favsync_core::MetadataLookup::new(),
    };
    let orchestrator = open_orchestrator(db_path, profile).await?;

    let outcome = orchestrator
        .sync(SyncOptions {
            metadata,
            ..SyncOptions::default()
        })
        .await;
    report_outcome(outcome)
}

pub fn report_outcome(outcome: SyncOutcome) -> Result<(), CliError> {
    match outcome {
        SyncOutcome::NotConfigured => Err(CliError::SyncNotConfigured),
        SyncOutcome::Succeeded { synced_at } => {
            println!("Sync completed at {}", format_timestamp(&synced_at));
            Ok(())
        }
        SyncOutcome::Failed { message } => Err(CliError::SyncFailed(message)),
    }
}
