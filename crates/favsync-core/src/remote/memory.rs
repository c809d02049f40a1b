//! In-process content store with hash-checked writes

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{RemoteContentStore, RemoteError, RemoteResult, WriteResult};
use crate::models::{ContentHandle, Credentials, FavoriteDocument};
use crate::util::now_iso8601;

#[derive(Debug, Clone)]
struct StoredContent {
    hash: String,
    text: String,
}

#[derive(Debug, Default)]
struct State {
    files: HashMap<String, StoredContent>,
    identities: HashMap<String, String>,
    revision: u64,
    read_failure: Option<(u16, String)>,
    write_rejection: Option<(u16, String)>,
}

impl State {
    fn next_hash(&mut self) -> String {
        self.revision += 1;
        format!("rev-{}", self.revision)
    }
}

/// Content store that behaves like the remote API without a network.
///
/// Every write produces a new hash and writes presenting a stale hash are
/// answered with [`WriteResult::Conflict`]. Failures and concurrent writers
/// can be injected, and calls are counted. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    state: Arc<Mutex<State>>,
    injected_conflicts: Arc<AtomicUsize>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as belonging to `login` in `validate_credentials`.
    #[must_use]
    pub fn with_identity(self, token: &str, login: &str) -> Self {
        if let Ok(mut state) = self.lock() {
            state
                .identities
                .insert(token.to_string(), login.to_string());
        }
        self
    }

    /// Store a document for `login` as if another client had written it.
    pub fn put_document(&self, login: &str, document: &FavoriteDocument) -> RemoteResult<String> {
        let text = document
            .to_canonical_json()
            .map_err(|error| RemoteError::InvalidPayload(error.to_string()))?;
        self.put_raw(login, text)
    }

    /// Store raw text for `login`, returning the new hash.
    pub fn put_raw(&self, login: &str, text: impl Into<String>) -> RemoteResult<String> {
        let mut state = self.lock()?;
        let hash = state.next_hash();
        state.files.insert(
            login.to_string(),
            StoredContent {
                hash: hash.clone(),
                text: text.into(),
            },
        );
        Ok(hash)
    }

    /// Current document for `login`, if one was written.
    pub fn document(&self, login: &str) -> Option<FavoriteDocument> {
        let state = self.lock().ok()?;
        let stored = state.files.get(login)?;
        FavoriteDocument::from_json_lossy(&stored.text)
    }

    /// Simulate a peer writing between our read and our next `count` writes.
    pub fn inject_conflicts(&self, count: usize) {
        self.injected_conflicts.store(count, Ordering::SeqCst);
    }

    /// Make every read fail with the given upstream status.
    pub fn fail_reads(&self, status: u16, message: impl Into<String>) {
        if let Ok(mut state) = self.lock() {
            state.read_failure = Some((status, message.into()));
        }
    }

    /// Make every write fail with a non-conflict rejection.
    pub fn reject_writes(&self, status: u16, message: impl Into<String>) {
        if let Ok(mut state) = self.lock() {
            state.write_rejection = Some((status, message.into()));
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> RemoteResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|error| RemoteError::Unavailable(error.to_string()))
    }

    fn take_injected_conflict(&self) -> bool {
        self.injected_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok()
    }
}

impl RemoteContentStore for MemoryContentStore {
    async fn read_document(&self, credentials: &Credentials) -> RemoteResult<ContentHandle> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        if let Some((status, message)) = state.read_failure.clone() {
            return Err(RemoteError::Read {
                status,
                message: format!("{message} ({status})"),
            });
        }

        Ok(state
            .files
            .get(&credentials.login)
            .map_or_else(ContentHandle::missing, |stored| ContentHandle {
                exists: true,
                hash: Some(stored.hash.clone()),
                document: FavoriteDocument::from_json_lossy(&stored.text),
            }))
    }

    async fn write_document(
        &self,
        credentials: &Credentials,
        document: &FavoriteDocument,
        expected_hash: Option<&str>,
    ) -> RemoteResult<WriteResult> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        if self.take_injected_conflict() {
            let current = self.document(&credentials.login);
            let text = current
                .map_or_else(|| Ok("{}".to_string()), |document| document.to_canonical_json())
                .map_err(|error| RemoteError::InvalidPayload(error.to_string()))?;
            self.put_raw(&credentials.login, text)?;
            return Ok(WriteResult::Conflict);
        }

        let mut state = self.lock()?;
        if let Some((status, message)) = state.write_rejection.clone() {
            return Ok(WriteResult::Rejected {
                status,
                message: format!("{message} ({status})"),
            });
        }

        let current_hash = state
            .files
            .get(&credentials.login)
            .map(|stored| stored.hash.clone());
        if current_hash.as_deref() != expected_hash {
            return Ok(WriteResult::Conflict);
        }

        let text = document
            .to_canonical_json()
            .map_err(|error| RemoteError::InvalidPayload(error.to_string()))?;
        let hash = state.next_hash();
        state.files.insert(
            credentials.login.clone(),
            StoredContent {
                hash: hash.clone(),
                text,
            },
        );

        Ok(WriteResult::Accepted {
            content_hash: Some(hash),
            committed_at: Some(now_iso8601()),
        })
    }

    async fn validate_credentials(&self, token: &str) -> RemoteResult<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RemoteError::InvalidCredentials(
                "GitHub access token is required.".to_string(),
            ));
        }
        self.lock()?
            .identities
            .get(token)
            .cloned()
            .ok_or_else(|| {
                RemoteError::InvalidCredentials(
                    "Token validation failed: Bad credentials (401)".to_string(),
                )
            })
    }
}
