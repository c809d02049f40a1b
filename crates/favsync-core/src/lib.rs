//! favsync-core - Core library for favsync
//!
//! This crate keeps a user-local list of favorite paper IDs consistent with a
//! single JSON document per user stored in a GitHub repository. Writes are
//! conditional on the content hash last read, so concurrent writers are
//! detected and the losing side retries once.

pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod sync;
pub mod util;

pub use config::RepoConfig;
pub use error::{Error, Result};
pub use models::{
    ContentHandle, Credentials, FavoriteDocument, FavoriteId, FavoriteItem, MetadataLookup,
    PaperMetadata, SyncPendingState, SyncStatus,
};
pub use reconcile::{merge_favorite_ids, reconcile};
pub use sync::{SyncOptions, SyncOrchestrator, SyncOutcome};
