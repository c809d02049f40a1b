//! Data models for favsync

mod credentials;
mod document;
mod favorite;
mod metadata;
mod sync_state;

pub use credentials::Credentials;
pub use document::{ContentHandle, FavoriteDocument, FavoriteItem, DOCUMENT_VERSION};
pub use favorite::{normalize_favorite_ids, FavoriteId};
pub use metadata::{MetadataLookup, PaperMetadata};
pub use sync_state::{SyncPendingState, SyncStatus};
