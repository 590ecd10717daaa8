// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Spatial filtering on record extents.
//!
//! Records carry axis-aligned boxes; query geometries are reduced to their
//! envelope and compared with closed-interval box relations. Distances use
//! the haversine formula for geographic CRSs and plain Euclidean distance
//! otherwise.

mod bbox;
mod chain;
pub mod crs;
mod predicate;

pub use bbox::{haversine_distance, BoundingBox};
pub use chain::SpatialPredicateChain;
pub use crs::{BuiltinTransform, CoordinateTransform};
pub use predicate::{Distance, DistanceUnit, SpatialKind, SpatialPredicate};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpatialError {
    #[error("no transform from {from} to {to}")]
    UnsupportedTransform { from: String, to: String },

    #[error("query geometry is empty")]
    EmptyGeometry,

    #[error("unknown distance unit: {0}")]
    UnknownUnit(String),
}
