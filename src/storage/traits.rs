// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::document::Document;
use crate::resolver::ResolveError;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index backend error: {0}")]
    Backend(String),
    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Index is closed")]
    Closed,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Changes committed together.
///
/// Applied in order: `clear`, then `removals`, then `upserts`. Upserts carry
/// the document's position in natural order.
#[derive(Debug, Default)]
pub struct WriteBatch {
    pub clear: bool,
    pub removals: BTreeSet<String>,
    pub upserts: BTreeMap<String, (u64, Arc<Document>)>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        !self.clear && self.removals.is_empty() && self.upserts.is_empty()
    }

    /// Number of documents touched.
    pub fn len(&self) -> usize {
        self.removals.len() + self.upserts.len()
    }
}

/// Outcome of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitStats {
    /// Generation of the snapshot now visible to readers
    pub generation: u64,
    /// Documents in that snapshot
    pub documents: usize,
}

/// Durable home of index documents.
///
/// `apply` must be atomic: after an error the store still holds exactly
/// what it held before the call.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Every stored document with its position, ordered by position.
    async fn load(&self) -> Result<Vec<(u64, Document)>, IndexError>;

    async fn apply(&self, batch: &WriteBatch) -> Result<(), IndexError>;

    async fn close(&self);
}
