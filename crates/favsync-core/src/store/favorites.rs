//! Favorite IDs, credentials and sync bookkeeping over a key/value store

use serde_json::Value;

use super::KeyValueStore;
use crate::error::Result;
use crate::models::{
    normalize_favorite_ids, Credentials, FavoriteId, SyncPendingState, SyncStatus,
};
use crate::util::{parse_or_default, scalar_text};

/// Storage keys, namespaced so they cannot collide with unrelated state.
pub mod keys {
    pub const PAPER_IDS: &str = "favorites.paper_ids";
    pub const SYNC_PENDING: &str = "favorites.sync_pending";
    pub const GITHUB_TOKEN: &str = "favorites.github_token";
    pub const GITHUB_LOGIN: &str = "favorites.github_login";
    pub const LAST_SYNC_AT: &str = "favorites.last_sync_at";
}

/// Typed view over the raw key/value store.
///
/// Reads are total: missing or corrupt values come back as defaults.
#[derive(Debug, Clone)]
pub struct LocalFavoriteStore<K> {
    kv: K,
}

impl<K: KeyValueStore> LocalFavoriteStore<K> {
    pub const fn new(kv: K) -> Self {
        Self { kv }
    }

    pub const fn backend(&self) -> &K {
        &self.kv
    }

    /// Stored IDs in order. Numeric entries are kept as text; entries that
    /// are neither strings nor numbers are skipped individually.
    pub async fn favorite_ids(&self) -> Vec<FavoriteId> {
        let raw = self.read_raw(keys::PAPER_IDS).await;
        let values: Vec<Value> = parse_or_default(raw.as_deref(), Vec::new());
        normalize_favorite_ids(values.iter().filter_map(scalar_text))
    }

    /// Normalize and persist, returning what was stored.
    pub async fn set_favorite_ids<I, S>(&self, ids: I) -> Result<Vec<FavoriteId>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = normalize_favorite_ids(ids);
        let raw = serde_json::to_string(&normalized)?;
        self.kv.set(keys::PAPER_IDS, &raw).await?;
        Ok(normalized)
    }

    pub async fn pending_state(&self) -> SyncPendingState {
        let raw = self.read_raw(keys::SYNC_PENDING).await;
        parse_or_default(raw.as_deref(), SyncPendingState::default())
    }

    pub async fn set_pending_state(&self, state: &SyncPendingState) -> Result<()> {
        let raw = serde_json::to_string(state)?;
        self.kv.set(keys::SYNC_PENDING, &raw).await
    }

    pub async fn clear_pending_state(&self) -> Result<()> {
        self.kv.remove(keys::SYNC_PENDING).await
    }

    /// Timestamp of the last successful sync, empty when there was none.
    pub async fn last_sync_at(&self) -> String {
        self.read_trimmed(keys::LAST_SYNC_AT).await
    }

    /// Blank timestamps are ignored.
    pub async fn set_last_sync_at(&self, timestamp: &str) -> Result<()> {
        if timestamp.is_empty() {
            return Ok(());
        }
        self.kv.set(keys::LAST_SYNC_AT, timestamp).await
    }

    pub async fn access_token(&self) -> String {
        self.read_trimmed(keys::GITHUB_TOKEN).await
    }

    pub async fn set_access_token(&self, token: &str) -> Result<()> {
        self.kv.set(keys::GITHUB_TOKEN, token.trim()).await
    }

    pub async fn clear_access_token(&self) -> Result<()> {
        self.kv.remove(keys::GITHUB_TOKEN).await
    }

    pub async fn login(&self) -> String {
        self.read_trimmed(keys::GITHUB_LOGIN).await
    }

    pub async fn set_login(&self, login: &str) -> Result<()> {
        self.kv.set(keys::GITHUB_LOGIN, login.trim()).await
    }

    pub async fn clear_login(&self) -> Result<()> {
        self.kv.remove(keys::GITHUB_LOGIN).await
    }

    /// Forget token and login together. Favorites are left alone.
    pub async fn clear_credentials(&self) -> Result<()> {
        self.clear_access_token().await?;
        self.clear_login().await
    }

    /// Stored credentials, present only when both token and login are set.
    pub async fn credentials(&self) -> Option<Credentials> {
        Credentials::new(self.access_token().await, self.login().await)
    }

    pub async fn is_sync_enabled(&self) -> bool {
        self.credentials().await.is_some()
    }

    pub async fn sync_status(&self) -> SyncStatus {
        let pending = self.pending_state().await;
        SyncStatus {
            enabled: self.is_sync_enabled().await,
            pending: pending.pending,
            last_error: pending.last_error,
            last_sync_at: self.last_sync_at().await,
        }
    }

    async fn read_trimmed(&self, key: &str) -> String {
        self.read_raw(key)
            .await
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    async fn read_raw(&self, key: &str) -> Option<String> {
        match self.kv.get(key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("Failed to read local key {}: {}", key, error);
                None
            }
        }
    }
}
