// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::traits::{IndexError, IndexStore, WriteBatch};
use crate::document::Document;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Volatile store. Also used by tests to inject commit failures.
pub struct InMemoryIndexStore {
    data: Mutex<HashMap<String, (u64, Arc<Document>)>>,
    fail_commits: AtomicBool,
    commits: AtomicU64,
}

impl InMemoryIndexStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            fail_commits: AtomicBool::new(false),
            commits: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Successful `apply` calls so far
    #[must_use]
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    /// Make every following `apply` fail without changing anything.
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::Relaxed);
    }
}

impl Default for InMemoryIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexStore for InMemoryIndexStore {
    async fn load(&self) -> Result<Vec<(u64, Document)>, IndexError> {
        let mut stored: Vec<(u64, Document)> = self
            .data
            .lock()
            .values()
            .map(|(position, doc)| (*position, doc.as_ref().clone()))
            .collect();
        stored.sort_by_key(|(position, _)| *position);
        Ok(stored)
    }

    async fn apply(&self, batch: &WriteBatch) -> Result<(), IndexError> {
        if self.fail_commits.load(Ordering::Relaxed) {
            return Err(IndexError::Backend("injected commit failure".into()));
        }
        let mut data = self.data.lock();
        if batch.clear {
            data.clear();
        }
        for id in &batch.removals {
            data.remove(id);
        }
        for (id, (position, doc)) in &batch.upserts {
            data.insert(id.clone(), (*position, Arc::clone(doc)));
        }
        self.commits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordKind;

    fn batch_with(ids: &[(&str, u64)]) -> WriteBatch {
        let mut batch = WriteBatch::default();
        for (id, position) in ids {
            batch.upserts.insert(
                id.to_string(),
                (*position, Arc::new(Document::new(*id, RecordKind::DublinCore))),
            );
        }
        batch
    }

    #[tokio::test]
    async fn test_apply_and_load_in_position_order() {
        let store = InMemoryIndexStore::new();
        store.apply(&batch_with(&[("b", 1), ("a", 0)])).await.unwrap();
        let loaded = store.load().await.unwrap();
        let ids: Vec<_> = loaded.iter().map(|(_, d)| d.identifier()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.commits(), 1);
    }

    #[tokio::test]
    async fn test_failed_apply_changes_nothing() {
        let store = InMemoryIndexStore::new();
        store.apply(&batch_with(&[("a", 0)])).await.unwrap();
        store.set_fail_commits(true);

        let mut batch = batch_with(&[("b", 1)]);
        batch.clear = true;
        assert!(store.apply(&batch).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_then_upsert() {
        let store = InMemoryIndexStore::new();
        store.apply(&batch_with(&[("a", 0), ("b", 1)])).await.unwrap();
        let mut batch = batch_with(&[("c", 2)]);
        batch.clear = true;
        store.apply(&batch).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1.identifier(), "c");
    }
}
