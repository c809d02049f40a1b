use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use favsync_core::config::ConfigError;
use favsync_core::remote::GitHubContentClient;
use favsync_core::store::{LibSqlKeyValueStore, LocalFavoriteStore};
use favsync_core::{
    ContentHandle, FavoriteId, FavoriteItem, MetadataLookup, PaperMetadata, RepoConfig,
    SyncOrchestrator, SyncStatus,
};
use serde::Serialize;

use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub const ENV_DB_PATH: &str = "FAVSYNC_DB_PATH";
pub const ENV_GITHUB_TOKEN: &str = "FAVSYNC_GITHUB_TOKEN";

pub type CliStore = LocalFavoriteStore<LibSqlKeyValueStore>;
pub type CliOrchestrator = SyncOrchestrator<LibSqlKeyValueStore, GitHubContentClient>;

#[derive(Debug, Serialize)]
pub struct RemoteItemView {
    pub paper_id: String,
    pub added_at: String,
    pub title: String,
    pub abs_url: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct RemoteView {
    pub exists: bool,
    pub hash: Option<String>,
    pub updated_at: Option<String>,
    pub items: Vec<RemoteItemView>,
    pub merged: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
    pub login: Option<String>,
    pub favorites: usize,
    #[serde(flatten)]
    pub status: SyncStatus,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os(ENV_DB_PATH).map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("favsync")
        .join("favsync.db")
}

pub async fn open_store(db_path: &Path) -> Result<CliStore, CliError> {
    let kv = LibSqlKeyValueStore::open(db_path).await?;
    Ok(LocalFavoriteStore::new(kv))
}

/// Store plus a GitHub client for the resolved profile.
pub async fn open_orchestrator(
    db_path: &Path,
    profile: Option<&str>,
) -> Result<CliOrchestrator, CliError> {
    let config = resolve_repo_config(profile)?;
    let remote = GitHubContentClient::new(config)?;
    let store = open_store(db_path).await?;
    Ok(SyncOrchestrator::new(store, remote))
}

pub fn resolve_repo_config(profile: Option<&str>) -> Result<RepoConfig, CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let repo = repo_config_from_sources(&profile, |name| env::var(name).ok()).map_err(|error| {
        CliError::Config(format!(
            "{error}. Run `favsync config init --profile {profile_name} --repo-owner <owner> --repo-name <repo>`."
        ))
    })?;
    tracing::debug!(
        "Profile '{}' targets {}/{} on branch {}",
        profile_name,
        repo.repo_owner,
        repo.repo_name,
        repo.data_branch
    );
    Ok(repo)
}

/// Environment values win over the stored profile, field by field.
pub fn repo_config_from_sources(
    profile: &CliProfile,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<RepoConfig, ConfigError> {
    RepoConfig::from_lookup(|name| {
        normalize_text_option(env_lookup(name)).or_else(|| profile.value_for(name))
    })
}

/// Parse raw CLI arguments into IDs, rejecting input with none left.
pub fn parse_id_arguments(ids: &[String]) -> Result<Vec<FavoriteId>, CliError> {
    let parsed = favsync_core::models::normalize_favorite_ids(ids);
    if parsed.is_empty() {
        return Err(CliError::EmptyIds);
    }
    Ok(parsed)
}

/// Read a JSON object mapping paper IDs to `{title, abs_url, date}`.
///
/// Entries with blank IDs are skipped.
pub fn load_metadata_file(path: &Path) -> Result<MetadataLookup, CliError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|error| CliError::Metadata(format!("{}: {error}", path.display())))?;
    parse_metadata(&raw).map_err(|error| CliError::Metadata(format!("{}: {error}", path.display())))
}

pub fn parse_metadata(raw: &str) -> Result<MetadataLookup, serde_json::Error> {
    let entries = serde_json::from_str::<HashMap<String, PaperMetadata>>(raw)?;
    Ok(entries
        .into_iter()
        .filter_map(|(id, metadata)| FavoriteId::parse(&id).map(|id| (id, metadata)))
        .collect())
}

pub fn remote_item_view(item: &FavoriteItem) -> RemoteItemView {
    RemoteItemView {
        paper_id: item.paper_id.to_string(),
        added_at: item.added_at.clone(),
        title: item.title.clone(),
        abs_url: item.abs_url.clone(),
        date: item.date.clone(),
    }
}

pub fn remote_view(handle: &ContentHandle, merged: &[FavoriteId]) -> RemoteView {
    RemoteView {
        exists: handle.exists,
        hash: handle.hash.clone(),
        updated_at: handle
            .document
            .as_ref()
            .map(|document| document.updated_at.clone()),
        items: handle.items().iter().map(remote_item_view).collect(),
        merged: merged.iter().map(ToString::to_string).collect(),
    }
}

pub fn format_remote_item_lines(items: &[FavoriteItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| {
            let paper_id = item.paper_id.as_str();
            let added = format_timestamp(&item.added_at);
            let title = if item.title.trim().is_empty() {
                "(untitled)"
            } else {
                item.title.trim()
            };
            format!("{paper_id:<20}  {added:<23}  {title}")
        })
        .collect()
}

pub fn format_status_lines(status: &SyncStatus, login: Option<&str>, favorites: usize) -> Vec<String> {
    let mut lines = Vec::new();
    match login {
        Some(login) if status.enabled => lines.push(format!("Sync: enabled ({login})")),
        _ => lines.push("Sync: not configured".to_string()),
    }
    lines.push(format!("Favorites: {favorites}"));
    if status.last_sync_at.is_empty() {
        lines.push("Last sync: never".to_string());
    } else {
        lines.push(format!("Last sync: {}", format_timestamp(&status.last_sync_at)));
    }
    if status.pending {
        lines.push("Pending: yes".to_string());
        if !status.last_error.is_empty() {
            lines.push(format!("Last error: {}", status.last_error));
        }
    }
    lines
}

/// Render an RFC 3339 timestamp in UTC, leaving unparseable text as is.
pub fn format_timestamp(value: &str) -> String {
    DateTime::parse_from_rfc3339(value.trim()).map_or_else(
        |_| value.trim().to_string(),
        |date_time| {
            date_time
                .with_timezone(&chrono::Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        },
    )
}
