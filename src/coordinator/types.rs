// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the catalog engine coordinator.

use crate::storage::IndexState;
use std::time::Duration;

/// Engine lifecycle state.
///
/// Before [`super::CatalogEngine::start()`] the engine is `Created`; after
/// that it mirrors the state of its index handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Just created, not yet started
    Created,
    /// Index open, serving searches and accepting writes
    Open,
    /// Full reindex in progress; readers still see the last commit
    Rebuilding,
    /// Shut down
    Closed,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Open => write!(f, "Open"),
            Self::Rebuilding => write!(f, "Rebuilding"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl From<IndexState> for EngineState {
    fn from(state: IndexState) -> Self {
        match state {
            IndexState::Open => Self::Open,
            IndexState::Rebuilding => Self::Rebuilding,
            IndexState::Closed => Self::Closed,
        }
    }
}

/// Outcome of a full reindex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    /// Documents in the index after the commit
    pub documents: usize,
    /// Generation published by the commit
    pub generation: u64,
    pub elapsed: Duration,
}
