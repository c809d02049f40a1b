//! libSQL-backed key/value store

use std::path::Path;

use libsql::{Builder, Connection, Database as LibSqlDatabase};

use super::{migrations, KeyValueStore};
use crate::error::Result;

/// Durable key/value store in a local libSQL file.
pub struct LibSqlKeyValueStore {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl LibSqlKeyValueStore {
    /// Open the store at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let path_str = path.as_ref().to_string_lossy().to_string();
        let db = Builder::new_local(&path_str).build().await?;
        Self::from_database(db).await
    }

    /// Open an in-memory store (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::from_database(db).await
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self> {
        let conn = db.connect()?;
        let store = Self { _db: db, conn };
        store.configure().await?;
        migrations::run(&store.conn).await?;
        Ok(store)
    }

    async fn configure(&self) -> Result<()> {
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok();
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        Ok(())
    }
}

impl KeyValueStore for LibSqlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT value FROM kv_store WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?, ?)",
                [key, value],
            )
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?", [key])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_get_remove_in_memory() {
        let store = LibSqlKeyValueStore::open_in_memory().await.unwrap();
        assert_eq!(store.get("favorites.paper_ids").await.unwrap(), None);

        store.set("favorites.paper_ids", "[\"a\"]").await.unwrap();
        store.set("favorites.paper_ids", "[\"b\"]").await.unwrap();
        assert_eq!(
            store.get("favorites.paper_ids").await.unwrap().as_deref(),
            Some("[\"b\"]")
        );

        store.remove("favorites.paper_ids").await.unwrap();
        assert_eq!(store.get("favorites.paper_ids").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_values_survive_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("favsync.db");

        {
            let store = LibSqlKeyValueStore::open(&path).await.unwrap();
            store.set("favorites.github_login", "octocat").await.unwrap();
        }

        let store = LibSqlKeyValueStore::open(&path).await.unwrap();
        assert_eq!(
            store.get("favorites.github_login").await.unwrap().as_deref(),
            Some("octocat")
        );
    }
}
