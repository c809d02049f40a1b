use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] favsync_core::Error),
    #[error(transparent)]
    Remote(#[from] favsync_core::remote::RemoteError),
    #[error(transparent)]
    Sync(#[from] favsync_core::sync::SyncError),
    #[error(transparent)]
    Profiles(#[from] crate::config_profiles::ProfileConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No valid paper IDs provided")]
    EmptyIds,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Failed to read metadata file: {0}")]
    Metadata(String),
    #[error("{0}")]
    SyncFailed(String),
    #[error(
        "Sync is not configured. Run `favsync config init --repo-owner <owner> --repo-name <repo>` and `favsync auth login --token <token>`."
    )]
    SyncNotConfigured,
}
