// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::resolver::ResolveError;
use crate::search::{QueryError, TranslateError};
use crate::spatial::SpatialError;
use crate::storage::IndexError;
use thiserror::Error;

/// Any failure surfaced by [`crate::CatalogEngine`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("engine not started")]
    NotStarted,
}

impl CatalogError {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Index(IndexError::Closed))
    }
}
