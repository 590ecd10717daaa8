// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! SQLite index file.
//!
//! One row per document, keyed by identifier:
//! ```sql
//! CREATE TABLE documents (
//!   identifier TEXT PRIMARY KEY,
//!   position   BIGINT NOT NULL,  -- natural order
//!   body       TEXT NOT NULL     -- serde_json Document
//! )
//! ```
//!
//! The `Any` driver may hand TEXT back as bytes, so `body` is read as
//! `String` with a `Vec<u8>` fallback.

use super::traits::{IndexError, IndexStore, WriteBatch};
use crate::document::Document;
use async_trait::async_trait;
use sqlx::{any::AnyPoolOptions, AnyPool, Row};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info};

pub const INDEX_FILE: &str = "index.db";

// SQLx `Any` driver requires runtime installation
static INSTALL_DRIVERS: Once = Once::new();

fn install_drivers() {
    INSTALL_DRIVERS.call_once(|| {
        sqlx::any::install_default_drivers();
    });
}

fn backend(context: &str) -> impl Fn(sqlx::Error) -> IndexError + '_ {
    move |e| IndexError::Backend(format!("{context}: {e}"))
}

pub struct SqliteIndexStore {
    pool: AnyPool,
    path: PathBuf,
}

impl SqliteIndexStore {
    /// Opens (creating if needed) `dir/index.db`.
    pub async fn open(dir: impl AsRef<Path>, max_connections: u32) -> Result<Self, IndexError> {
        install_drivers();

        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            IndexError::Backend(format!("Failed to create index directory {}: {e}", dir.display()))
        })?;
        let path = dir.join(INDEX_FILE);
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(10))
            .connect(&url)
            .await
            .map_err(backend("Failed to open index"))?;

        let store = Self { pool, path };
        store.enable_wal_mode().await?;
        store.init_schema().await?;
        info!(path = %store.path.display(), "Opened SQLite index");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn enable_wal_mode(&self) -> Result<(), IndexError> {
        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&self.pool)
            .await
            .map_err(backend("Failed to enable WAL mode"))?;
        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&self.pool)
            .await
            .map_err(backend("Failed to set synchronous mode"))?;
        Ok(())
    }

    async fn init_schema(&self) -> Result<(), IndexError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                identifier TEXT PRIMARY KEY,
                position BIGINT NOT NULL,
                body TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(backend("Failed to create documents table"))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_position ON documents (position)")
            .execute(&self.pool)
            .await
            .map_err(backend("Failed to create position index"))?;
        Ok(())
    }
}

#[async_trait]
impl IndexStore for SqliteIndexStore {
    async fn load(&self) -> Result<Vec<(u64, Document)>, IndexError> {
        let rows = sqlx::query("SELECT position, body FROM documents ORDER BY position")
            .fetch_all(&self.pool)
            .await
            .map_err(backend("Failed to load documents"))?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let position: i64 = row
                .try_get("position")
                .map_err(backend("Failed to read position"))?;
            let body: Vec<u8> = match row.try_get::<String, _>("body") {
                Ok(text) => text.into_bytes(),
                Err(_) => row
                    .try_get::<Vec<u8>, _>("body")
                    .map_err(backend("Failed to read body"))?,
            };
            let doc: Document = serde_json::from_slice(&body)?;
            stored.push((position as u64, doc));
        }
        debug!(documents = stored.len(), "Loaded index documents");
        Ok(stored)
    }

    async fn apply(&self, batch: &WriteBatch) -> Result<(), IndexError> {
        // Serialize up front so a bad document never leaves a half-open transaction.
        let mut bodies = Vec::with_capacity(batch.upserts.len());
        for (id, (position, doc)) in &batch.upserts {
            bodies.push((id, *position as i64, serde_json::to_string(doc.as_ref())?));
        }

        let mut tx = self.pool.begin().await.map_err(backend("Failed to begin commit"))?;

        if batch.clear {
            sqlx::query("DELETE FROM documents")
                .execute(&mut *tx)
                .await
                .map_err(backend("Failed to clear documents"))?;
        }

        for id in &batch.removals {
            sqlx::query("DELETE FROM documents WHERE identifier = ?")
                .bind(id.as_str())
                .execute(&mut *tx)
                .await
                .map_err(backend("Failed to remove document"))?;
        }

        for (id, position, body) in bodies {
            sqlx::query(
                "INSERT INTO documents (identifier, position, body) VALUES (?, ?, ?)
                 ON CONFLICT(identifier) DO UPDATE SET
                    position = excluded.position,
                    body = excluded.body",
            )
            .bind(id.as_str())
            .bind(position)
            .bind(body)
            .execute(&mut *tx)
            .await
            .map_err(backend("Failed to write document"))?;
        }

        tx.commit().await.map_err(backend("Failed to commit"))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!(path = %self.path.display(), "Closed SQLite index");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordKind;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn upsert(batch: &mut WriteBatch, id: &str, position: u64) {
        batch.upserts.insert(
            id.to_string(),
            (position, Arc::new(Document::new(id, RecordKind::Iso19115))),
        );
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = SqliteIndexStore::open(dir.path(), 2).await.unwrap();
            let mut batch = WriteBatch::default();
            upsert(&mut batch, "b", 1);
            upsert(&mut batch, "a", 0);
            store.apply(&batch).await.unwrap();
            store.close().await;
        }

        let store = SqliteIndexStore::open(dir.path(), 2).await.unwrap();
        let loaded = store.load().await.unwrap();
        let ids: Vec<_> = loaded.iter().map(|(_, d)| d.identifier()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(loaded[0].1.kind(), RecordKind::Iso19115);
        store.close().await;
    }

    #[tokio::test]
    async fn test_clear_removals_and_upserts_in_one_commit() {
        let dir = tempdir().unwrap();
        let store = SqliteIndexStore::open(dir.path(), 1).await.unwrap();

        let mut first = WriteBatch::default();
        upsert(&mut first, "a", 0);
        upsert(&mut first, "b", 1);
        store.apply(&first).await.unwrap();

        let mut second = WriteBatch::default();
        second.removals.insert("a".into());
        upsert(&mut second, "b", 5);
        store.apply(&second).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, 5);

        let mut third = WriteBatch::default();
        third.clear = true;
        upsert(&mut third, "c", 6);
        store.apply(&third).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1.identifier(), "c");
        store.close().await;
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("catalog").join("index");
        let store = SqliteIndexStore::open(&nested, 1).await.unwrap();
        assert!(store.path().exists());
        store.close().await;
    }
}
