//! # SQLite key-value store
//!
//! Persistent [`KeyValueStore`] backed by a single SQLite table.
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE kv (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL,
//!     updated_at TEXT NOT NULL
//! );
//! ```
//!
//! `set` is an upsert; each record is written atomically, with no transaction
//! spanning several keys.

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use memory_core::KeyValueStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Opens (or creates) the database file at `path`, creating parent directories.
    pub async fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }
        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(path);
        let pool = SqlitePool::connect_with(options).await?;
        Self::open(pool, &path.display().to_string()).await
    }

    /// Opens a database from a `sqlite://` URL.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        if let Some(path) = database_url
            .strip_prefix("sqlite://")
            .filter(|p| !p.is_empty() && !p.starts_with(':'))
        {
            return Self::new(path).await;
        }
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {}", database_url))?
            .create_if_missing(true);
        // Each connection to `:memory:` is a separate database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 10 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::open(pool, database_url).await
    }

    async fn open(pool: SqlitePool, label: &str) -> anyhow::Result<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        info!(database = %label, "SQLite kv store ready");
        Ok(store)
    }

    async fn init_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some(row) => Some(row.try_get::<String, _>("value")?),
            None => None,
        })
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        debug!(key = %key, bytes = value.len(), "kv set");
        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_store() -> (SqliteKvStore, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");
        let store = SqliteKvStore::new(&db_path).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_get_absent() {
        let (store, _dir) = create_test_store().await;
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let (store, _dir) = create_test_store().await;
        store.set("companion_settings", "{}".to_string()).await.unwrap();
        store
            .set("companion_settings", r#"{"apiKey":"k"}"#.to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("companion_settings").await.unwrap().as_deref(),
            Some(r#"{"apiKey":"k"}"#)
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let (store, _dir) = create_test_store().await;
        store.set("k", "v".to_string()).await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("persist.db");

        {
            let store = SqliteKvStore::new(&db_path).await.unwrap();
            store.set("k", "kept".to_string()).await.unwrap();
            store.pool.close().await;
        }

        let url = format!("sqlite://{}", db_path.display());
        let reopened = SqliteKvStore::connect(&url).await.unwrap();
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_connect_in_memory_url() {
        let store = SqliteKvStore::connect("sqlite::memory:").await.unwrap();
        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
