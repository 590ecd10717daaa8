// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Engine lifecycle management: start and shutdown.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::metrics;
use crate::storage::{InMemoryIndexStore, IndexHandle, IndexStore, SqliteIndexStore};

use super::{CatalogEngine, EngineState};

impl CatalogEngine {
    /// Open the index named by the config.
    ///
    /// With `index_dir` set the index lives in `index.db` inside that
    /// directory (created if missing); otherwise it is held in memory.
    /// Starting an engine whose index is already open is a no-op.
    #[tracing::instrument(skip(self), fields(index_dir = ?self.config.index_dir))]
    pub async fn start(&mut self) -> Result<(), CatalogError> {
        if self.is_started() {
            warn!(state = %self.state(), "Engine already started");
            return Ok(());
        }
        let store: Arc<dyn IndexStore> = match self.config.index_dir {
            Some(ref dir) => Arc::new(
                SqliteIndexStore::open(Path::new(dir), self.config.max_connections).await?,
            ),
            None => {
                info!("No index directory configured, keeping the index in memory");
                Arc::new(InMemoryIndexStore::new())
            }
        };
        self.start_with_store(store).await
    }

    /// Open the index over a caller-supplied store.
    pub async fn start_with_store(&mut self, store: Arc<dyn IndexStore>) -> Result<(), CatalogError> {
        if self.is_started() {
            warn!(state = %self.state(), "Engine already started");
            return Ok(());
        }

        let handle = IndexHandle::open(store).await?;
        let documents = handle.snapshot()?.len();
        self.index = Some(handle);
        self.cache.clear();
        metrics::set_engine_state(&self.state().to_string());

        info!(documents, "Catalog engine started");
        Ok(())
    }

    fn is_started(&self) -> bool {
        matches!(self.state(), EngineState::Open | EngineState::Rebuilding)
    }

    /// Close the index. Waits for an in-flight writer to finish.
    ///
    /// Searches and writes fail with a closed-index error afterwards.
    #[tracing::instrument(skip(self))]
    pub async fn shutdown(&self) {
        let Some(ref index) = self.index else {
            return;
        };
        info!("Shutting down catalog engine...");
        index.close().await;
        self.cache.clear();
        metrics::set_engine_state(&EngineState::Closed.to_string());
        info!("Catalog engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_start_in_memory() {
        let mut engine = CatalogEngine::new(CatalogConfig::default());
        assert_eq!(engine.state(), EngineState::Created);
        assert!(matches!(engine.snapshot(), Err(CatalogError::NotStarted)));

        engine.start().await.unwrap();
        assert_eq!(engine.state(), EngineState::Open);
        assert!(engine.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_creates_index_directory() {
        let dir = tempdir().unwrap();
        let index_dir = dir.path().join("catalog").join("index");
        let mut engine = CatalogEngine::new(CatalogConfig {
            index_dir: Some(index_dir.to_string_lossy().into_owned()),
            ..Default::default()
        });

        engine.start().await.unwrap();
        assert!(index_dir.join("index.db").exists());
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_closes_index() {
        let mut engine = CatalogEngine::new(CatalogConfig::default());
        engine.start().await.unwrap();
        engine.shutdown().await;

        assert_eq!(engine.state(), EngineState::Closed);
        assert!(engine.snapshot().unwrap_err().is_closed());

        // Closed engines can be started again
        engine.start().await.unwrap();
        assert_eq!(engine.state(), EngineState::Open);
    }

    #[tokio::test]
    async fn test_shutdown_before_start_is_noop() {
        let engine = CatalogEngine::new(CatalogConfig::default());
        engine.shutdown().await;
        assert_eq!(engine.state(), EngineState::Created);
    }

    #[tokio::test]
    async fn test_second_start_keeps_index() {
        let store = Arc::new(InMemoryIndexStore::new());
        let mut engine = CatalogEngine::new(CatalogConfig::default());
        engine.start_with_store(store.clone()).await.unwrap();
        let record = crate::model::DublinCoreRecord::new("kept");
        engine.index_document(&record).await.unwrap();

        engine.start().await.unwrap();
        assert_eq!(engine.state(), EngineState::Open);
        assert!(engine.snapshot().unwrap().contains("kept"));
    }
}
