//! One synchronization attempt between the local favorites and the remote
//! document.
//!
//! Each attempt is read → reconcile → conditional write. A write that loses
//! the race (stale hash) triggers one more full cycle with a fresh read. A
//! second conflict is reported as a failure; retrying further could livelock
//! against a peer that keeps writing.

use thiserror::Error;

use crate::models::{
    normalize_favorite_ids, ContentHandle, Credentials, FavoriteDocument, FavoriteId,
    MetadataLookup, SyncPendingState, SyncStatus,
};
use crate::reconcile::{merge_favorite_ids, reconcile};
use crate::remote::{RemoteContentStore, RemoteError, RemoteResult, WriteResult};
use crate::store::{KeyValueStore, LocalFavoriteStore};
use crate::util::now_iso8601;

/// Extra read/write cycles allowed after a conflicting write.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 1;
/// Upper bound for [`SyncOrchestrator::with_conflict_retries`].
pub const MAX_CONFLICT_RETRIES: u32 = 1;

/// Inputs for [`SyncOrchestrator::sync`]; anything absent is read from the
/// local store.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub credentials: Option<Credentials>,
    pub favorite_ids: Option<Vec<String>>,
    pub metadata: MetadataLookup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No credentials are available; sync is disabled, not failing.
    NotConfigured,
    Succeeded { synced_at: String },
    Failed { message: String },
}

impl SyncOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Load remote favorites failed: {0}")]
    Read(#[source] RemoteError),
    #[error("Sync favorites failed: {0}")]
    Write(#[source] RemoteError),
    #[error("Sync favorites failed: {message}")]
    Rejected { status: u16, message: String },
    #[error("Sync favorites failed: remote favorites kept changing ({attempts} conflicting writes)")]
    Conflict { attempts: u32 },
    #[error("{0}")]
    Credentials(#[source] RemoteError),
    #[error(transparent)]
    Storage(#[from] crate::Error),
}

/// Drives sync attempts. Holds no state of its own between calls.
#[derive(Debug, Clone)]
pub struct SyncOrchestrator<K, R> {
    store: LocalFavoriteStore<K>,
    remote: R,
    conflict_retries: u32,
}

impl<K: KeyValueStore, R: RemoteContentStore> SyncOrchestrator<K, R> {
    pub const fn new(store: LocalFavoriteStore<K>, remote: R) -> Self {
        Self {
            store,
            remote,
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }

    /// Set how many fresh cycles follow a conflicting write. Values above
    /// [`MAX_CONFLICT_RETRIES`] are clamped; zero disables retrying.
    #[must_use]
    pub const fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = if retries > MAX_CONFLICT_RETRIES {
            MAX_CONFLICT_RETRIES
        } else {
            retries
        };
        self
    }

    pub const fn store(&self) -> &LocalFavoriteStore<K> {
        &self.store
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Run one sync. Never returns an error: failures are recorded in the
    /// local pending state and reported as [`SyncOutcome::Failed`].
    pub async fn sync(&self, options: SyncOptions) -> SyncOutcome {
        let credentials = match options.credentials {
            Some(credentials) => Some(credentials),
            None => self.store.credentials().await,
        };
        let Some(credentials) = credentials else {
            tracing::debug!("Favorites sync skipped: no credentials configured");
            return SyncOutcome::NotConfigured;
        };

        let favorite_ids = match options.favorite_ids {
            Some(ids) => normalize_favorite_ids(ids),
            None => self.store.favorite_ids().await,
        };

        match self
            .write_with_retry(&credentials, &favorite_ids, &options.metadata)
            .await
        {
            Ok(document) => {
                self.record_success(&document.updated_at).await;
                tracing::info!(
                    "Synced {} favorites for {}",
                    document.items.len(),
                    credentials.login
                );
                SyncOutcome::Succeeded {
                    synced_at: document.updated_at,
                }
            }
            Err(error) => {
                let message = error.to_string();
                tracing::warn!("Favorites sync failed: {}", message);
                self.record_failure(&message).await;
                SyncOutcome::Failed { message }
            }
        }
    }

    async fn write_with_retry(
        &self,
        credentials: &Credentials,
        favorite_ids: &[FavoriteId],
        metadata: &MetadataLookup,
    ) -> Result<FavoriteDocument, SyncError> {
        let max_attempts = self.conflict_retries.saturating_add(1);
        let mut attempt = 1;

        loop {
            tracing::debug!("Reading remote favorites (attempt {})", attempt);
            let handle = self
                .remote
                .read_document(credentials)
                .await
                .map_err(SyncError::Read)?;

            let document = reconcile(
                &credentials.login,
                favorite_ids,
                handle.items(),
                metadata,
                &now_iso8601(),
            );

            tracing::debug!(
                "Writing {} favorites (expected hash: {:?})",
                document.items.len(),
                handle.hash
            );
            let result = self
                .remote
                .write_document(credentials, &document, handle.hash.as_deref())
                .await
                .map_err(SyncError::Write)?;

            match result {
                WriteResult::Accepted {
                    content_hash,
                    committed_at,
                } => {
                    tracing::debug!(
                        "Remote accepted favorites (hash: {:?}, committed at: {:?})",
                        content_hash,
                        committed_at
                    );
                    return Ok(document);
                }
                WriteResult::Conflict if attempt < max_attempts => {
                    tracing::warn!(
                        "Remote favorites changed during sync; retrying with a fresh read"
                    );
                    attempt += 1;
                }
                WriteResult::Conflict => return Err(SyncError::Conflict { attempts: attempt }),
                WriteResult::Rejected { status, message } => {
                    return Err(SyncError::Rejected { status, message });
                }
            }
        }
    }

    async fn record_success(&self, synced_at: &str) {
        if let Err(error) = self.store.set_last_sync_at(synced_at).await {
            tracing::warn!("Failed to record last sync time: {}", error);
        }
        if let Err(error) = self.store.clear_pending_state().await {
            tracing::warn!("Failed to clear pending sync state: {}", error);
        }
    }

    async fn record_failure(&self, message: &str) {
        let state = SyncPendingState::failed(message, now_iso8601());
        if let Err(error) = self.store.set_pending_state(&state).await {
            tracing::warn!("Failed to record pending sync state: {}", error);
        }
    }

    pub async fn sync_status(&self) -> SyncStatus {
        self.store.sync_status().await
    }

    /// Remote snapshot for the stored user; missing when not configured.
    pub async fn fetch_remote_for_current_user(&self) -> RemoteResult<ContentHandle> {
        let Some(credentials) = self.store.credentials().await else {
            return Ok(ContentHandle::missing());
        };
        self.remote.read_document(&credentials).await
    }

    /// Union of local favorites and the remote document, for display before
    /// a sync. Does not modify anything.
    pub async fn merged_favorite_ids(&self) -> RemoteResult<Vec<FavoriteId>> {
        let handle = self.fetch_remote_for_current_user().await?;
        let local = self.store.favorite_ids().await;
        Ok(merge_favorite_ids(&local, handle.items()))
    }

    /// Validate `token` against the remote and store it with its login.
    pub async fn connect(&self, token: &str) -> Result<Credentials, SyncError> {
        let login = self
            .remote
            .validate_credentials(token)
            .await
            .map_err(SyncError::Credentials)?;
        let credentials = Credentials::new(token, &login).ok_or_else(|| {
            SyncError::Credentials(RemoteError::InvalidCredentials(
                "Token validation failed: missing login.".to_string(),
            ))
        })?;

        self.store.set_access_token(&credentials.token).await?;
        self.store.set_login(&credentials.login).await?;
        tracing::info!("Connected favorites sync for {}", credentials.login);
        Ok(credentials)
    }

    /// Forget stored credentials. Favorites stay in place.
    pub async fn disconnect(&self) -> crate::Result<()> {
        self.store.clear_credentials().await?;
        tracing::info!("Disconnected favorites sync");
        Ok(())
    }
}
