// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Write API: full reindex, incremental add, removal.
//!
//! Every write goes through one [`IndexWriter`](crate::storage::IndexWriter)
//! guard and becomes visible only when its commit succeeds. A failure at
//! any step drops the guard, which discards the staged changes.

use std::time::Instant;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::metrics::{self, LatencyTimer};
use crate::model::MetadataRecord;
use crate::storage::CommitStats;

use super::{BuildStats, CatalogEngine};

impl CatalogEngine {
    /// Replace the whole index with documents built from `records`.
    ///
    /// All-or-nothing: readers keep seeing the previous index until the
    /// single commit at the end, and a record that cannot be stringified
    /// aborts the build with the previous index intact.
    #[tracing::instrument(skip_all)]
    pub async fn build_index<'r, I>(&self, records: I) -> Result<BuildStats, CatalogError>
    where
        I: IntoIterator<Item = &'r dyn MetadataRecord>,
    {
        let start = Instant::now();
        let _timer = LatencyTimer::new("build");
        let mut writer = self.index()?.rebuild().await?;
        metrics::set_engine_state(&self.state().to_string());

        let built = records
            .into_iter()
            .try_for_each(|record| self.builder.build(record).map(|doc| writer.add(doc)));
        let staged = writer.staged_len();
        let committed = match built {
            Ok(()) => writer.commit().await.map_err(CatalogError::from),
            Err(e) => {
                drop(writer);
                Err(e.into())
            }
        };
        // The writer guard has restored Open on every path by now
        metrics::set_engine_state(&self.state().to_string());
        let stats = committed?;

        let elapsed = start.elapsed();
        info!(
            documents = stats.documents,
            staged,
            generation = stats.generation,
            elapsed_ms = elapsed.as_millis() as u64,
            "Index rebuilt"
        );
        Ok(BuildStats {
            documents: stats.documents,
            generation: stats.generation,
            elapsed,
        })
    }

    /// Add or replace one record's document.
    #[tracing::instrument(skip_all, fields(identifier = %record.identifier()))]
    pub async fn index_document(&self, record: &dyn MetadataRecord) -> Result<CommitStats, CatalogError> {
        let _timer = LatencyTimer::new("index");
        let document = self.builder.build(record)?;

        let mut writer = self.index()?.writer().await?;
        writer.add(document);
        let stats = writer.commit().await?;

        debug!(generation = stats.generation, documents = stats.documents, "Document indexed");
        Ok(stats)
    }

    /// Remove a record's document. Returns whether it was indexed.
    #[tracing::instrument(skip(self))]
    pub async fn remove_document(&self, identifier: &str) -> Result<bool, CatalogError> {
        let mut writer = self.index()?.writer().await?;
        if !writer.remove(identifier) {
            debug!("Document not indexed, nothing to remove");
            return Ok(false);
        }
        let stats = writer.commit().await?;

        debug!(generation = stats.generation, documents = stats.documents, "Document removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::model::DublinCoreRecord;
    use crate::storage::InMemoryIndexStore;
    use std::sync::Arc;

    async fn engine() -> (CatalogEngine, Arc<InMemoryIndexStore>) {
        let store = Arc::new(InMemoryIndexStore::new());
        let mut engine = CatalogEngine::new(CatalogConfig::default());
        engine.start_with_store(store.clone()).await.unwrap();
        (engine, store)
    }

    #[tokio::test]
    async fn test_build_index_replaces_contents() {
        let (engine, store) = engine().await;
        let a = DublinCoreRecord::new("a").with_title("first");
        let b = DublinCoreRecord::new("b").with_title("second");

        let first: [&dyn MetadataRecord; 2] = [&a, &b];
        let stats = engine.build_index(first).await.unwrap();
        assert_eq!(stats.documents, 2);
        assert_eq!(stats.generation, 1);

        let second: [&dyn MetadataRecord; 1] = [&b];
        let stats = engine.build_index(second).await.unwrap();
        assert_eq!(stats.documents, 1);
        assert_eq!(store.len(), 1);
        assert!(!engine.snapshot().unwrap().contains("a"));
    }

    #[tokio::test]
    async fn test_failed_build_keeps_previous_index() {
        let (engine, store) = engine().await;
        let a = DublinCoreRecord::new("a").with_title("first");
        let records: [&dyn MetadataRecord; 1] = [&a];
        engine.build_index(records).await.unwrap();

        store.set_fail_commits(true);
        let b = DublinCoreRecord::new("b").with_title("second");
        let records: [&dyn MetadataRecord; 1] = [&b];
        assert!(engine.build_index(records).await.is_err());

        let snapshot = engine.snapshot().unwrap();
        assert!(snapshot.contains("a"));
        assert!(!snapshot.contains("b"));
        assert_eq!(engine.state(), crate::EngineState::Open);
    }

    #[tokio::test]
    async fn test_index_then_remove() {
        let (engine, _store) = engine().await;
        let a = DublinCoreRecord::new("a").with_title("first");

        let stats = engine.index_document(&a).await.unwrap();
        assert_eq!(stats.documents, 1);
        assert!(engine.remove_document("a").await.unwrap());
        assert!(!engine.remove_document("a").await.unwrap());
        assert!(engine.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_writes_before_start_fail() {
        let engine = CatalogEngine::new(CatalogConfig::default());
        let a = DublinCoreRecord::new("a");
        assert!(matches!(
            engine.index_document(&a).await,
            Err(CatalogError::NotStarted)
        ));
    }
}
