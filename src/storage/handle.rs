// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Single-writer, many-reader access to the index.
//!
//! Readers take an `Arc<IndexSnapshot>` and keep it for as long as they
//! like; a commit publishes a new snapshot without disturbing them. Writers
//! queue on one async lock and stage their changes on a private copy, so an
//! abandoned or failed writer leaves the published snapshot untouched.

use super::snapshot::IndexSnapshot;
use super::traits::{CommitStats, IndexError, IndexStore, WriteBatch};
use crate::document::Document;
use crate::metrics::{self, LatencyTimer};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexState {
    Closed,
    Open,
    /// A full rebuild holds the writer; readers still see the previous
    /// snapshot until it commits.
    Rebuilding,
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Open => write!(f, "Open"),
            Self::Rebuilding => write!(f, "Rebuilding"),
        }
    }
}

pub struct IndexHandle {
    store: Arc<dyn IndexStore>,
    current: RwLock<Arc<IndexSnapshot>>,
    writer: Mutex<()>,
    state: watch::Sender<IndexState>,
}

impl IndexHandle {
    /// Loads whatever `store` already holds.
    pub async fn open(store: Arc<dyn IndexStore>) -> Result<Self, IndexError> {
        let snapshot = IndexSnapshot::from_stored(0, store.load().await?);
        info!(documents = snapshot.len(), "Index opened");
        metrics::set_index_documents(snapshot.len());
        let (state, _) = watch::channel(IndexState::Open);
        Ok(Self {
            store,
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
            state,
        })
    }

    pub fn state(&self) -> IndexState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<IndexState> {
        self.state.subscribe()
    }

    /// Latest committed snapshot.
    pub fn snapshot(&self) -> Result<Arc<IndexSnapshot>, IndexError> {
        if self.state() == IndexState::Closed {
            return Err(IndexError::Closed);
        }
        Ok(Arc::clone(&self.current.read()))
    }

    /// Waits for the writer lock. Copies the current snapshot's entry list,
    /// see [`IndexWriter`].
    pub async fn writer(&self) -> Result<IndexWriter<'_>, IndexError> {
        let lock = self.writer.lock().await;
        if self.state() == IndexState::Closed {
            return Err(IndexError::Closed);
        }
        let staged = IndexSnapshot::clone(&self.current.read());
        Ok(IndexWriter {
            handle: self,
            _lock: lock,
            staged,
            batch: WriteBatch::default(),
            rebuilding: false,
            committed: false,
        })
    }

    /// Writer that starts from an empty index and replaces everything on
    /// commit.
    pub async fn rebuild(&self) -> Result<IndexWriter<'_>, IndexError> {
        let mut writer = self.writer().await?;
        writer.staged.clear();
        writer.batch.clear = true;
        writer.rebuilding = true;
        self.state.send_replace(IndexState::Rebuilding);
        debug!("Index rebuild started");
        Ok(writer)
    }

    /// Waits for any active writer, then closes the store.
    pub async fn close(&self) {
        let _lock = self.writer.lock().await;
        if self.state.send_replace(IndexState::Closed) == IndexState::Closed {
            return;
        }
        self.store.close().await;
        info!("Index closed");
    }
}

/// Exclusive, staged write access. Dropping without [`commit`] discards
/// every staged change.
///
/// The staged view starts as a copy of the current snapshot. Documents are
/// shared, but the entry list and identifier map are copied, so opening a
/// writer costs O(n) in the index size even for a single add or remove.
///
/// [`commit`]: IndexWriter::commit
pub struct IndexWriter<'a> {
    handle: &'a IndexHandle,
    _lock: MutexGuard<'a, ()>,
    staged: IndexSnapshot,
    batch: WriteBatch,
    rebuilding: bool,
    committed: bool,
}

impl IndexWriter<'_> {
    /// Adds or replaces the document with the same identifier.
    pub fn add(&mut self, doc: Document) {
        let doc = Arc::new(doc);
        let position = self.staged.upsert(Arc::clone(&doc));
        let id = doc.identifier().to_string();
        self.batch.removals.remove(&id);
        self.batch.upserts.insert(id, (position, doc));
    }

    /// Returns false when no such document is staged.
    pub fn remove(&mut self, identifier: &str) -> bool {
        let existed = self.staged.remove(identifier);
        self.batch.upserts.remove(identifier);
        if existed && !self.batch.clear {
            self.batch.removals.insert(identifier.to_string());
        }
        existed
    }

    /// Documents the staged index would hold.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Persists the staged changes, then publishes them to readers.
    pub async fn commit(mut self) -> Result<CommitStats, IndexError> {
        let current_generation = self.handle.current.read().generation();
        if self.batch.is_empty() {
            self.committed = true;
            return Ok(CommitStats {
                generation: current_generation,
                documents: self.staged.len(),
            });
        }

        let _timer = LatencyTimer::new("commit");
        let touched = self.batch.len();
        self.handle
            .store
            .apply(&self.batch)
            .await
            .inspect_err(|e| {
                warn!(error = %e, pending = touched, "Index commit failed");
                metrics::record_commit_failed();
            })?;

        let generation = current_generation + 1;
        let snapshot = std::mem::take(&mut self.staged).with_generation(generation);
        let documents = snapshot.len();
        *self.handle.current.write() = Arc::new(snapshot);
        self.committed = true;

        metrics::record_commit(touched);
        metrics::set_index_documents(documents);
        debug!(generation, documents, touched, "Index commit");
        Ok(CommitStats {
            generation,
            documents,
        })
    }
}

impl Drop for IndexWriter<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.batch.is_empty() {
            debug!(pending = self.batch.len(), "Discarding uncommitted index changes");
        }
        if self.rebuilding {
            self.handle.state.send_if_modified(|state| {
                if *state == IndexState::Rebuilding {
                    *state = IndexState::Open;
                    true
                } else {
                    false
                }
            });
        }
    }
}
