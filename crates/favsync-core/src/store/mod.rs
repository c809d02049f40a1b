//! Local persistence for favorites and sync bookkeeping

mod database;
mod favorites;
mod memory;
mod migrations;

pub use database::LibSqlKeyValueStore;
pub use favorites::{keys, LocalFavoriteStore};
pub use memory::MemoryKeyValueStore;

use crate::error::Result;

/// String key/value storage backing the favorite store (async)
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read a raw value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a raw value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
