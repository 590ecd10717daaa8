// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Infrastructure
//!
//! Structured catalog filters are translated into a textual query plus an
//! optional spatial predicate chain, then evaluated against an index
//! snapshot.
//!
//! # Architecture
//!
//! ```text
//! FilterNode (AST) + SortBy
//!     ↓ FilterTranslator (FieldMapping alias table)
//! SpatialQuery { text, spatial chain, combinator, sort | identifiers }
//!     ↓ QueryExecutor (lucene grammar, SpatialPredicateChain)
//! ordered identifiers
//! ```
//!
//! # Example
//!
//! ```rust
//! use catalog_index::search::{FilterNode, FilterTranslator, LogicalOp};
//!
//! let filter = FilterNode::equal_to("Title", "starship trooper").negate();
//! let query = FilterTranslator::default().translate(Some(&filter), None).unwrap();
//!
//! assert_eq!(query.text_query(), r#"Title:"starship trooper""#);
//! assert_eq!(query.logical_combinator(), Some(LogicalOp::Not));
//! ```

mod executor;
mod fields;
mod filter;
pub mod lucene;
mod query;
mod search_cache;
mod translator;

pub use executor::QueryExecutor;
pub use fields::{FieldMapping, FieldTarget};
pub use filter::{ComparisonOp, FilterNode, LikePattern, Literal, LogicalOp, SortBy, SpatialFilter};
pub use query::{SortSpec, SpatialQuery};
pub use search_cache::{SearchCache, SearchCacheStats};
pub use translator::FilterTranslator;

use crate::spatial::SpatialError;
use thiserror::Error;

/// Text query failures at execution time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("query syntax error: {0}")]
    Parse(String),

    #[error("invalid wildcard pattern: {0}")]
    InvalidPattern(String),
}

/// Filter translation failures. Translation fails closed: a filter that
/// cannot be expressed exactly is rejected, never broadened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslateError {
    #[error("no index field for property {0}")]
    UnknownProperty(String),

    #[error("{0} is not a spatial property")]
    UnsupportedSpatialProperty(String),

    #[error("{0} combines more than one spatial expression")]
    MultipleSpatialSources(LogicalOp),

    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),

    #[error("invalid literal for {property}: {reason}")]
    InvalidLiteral { property: String, reason: String },

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

impl TranslateError {
    /// Metric label
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnknownProperty(_) => "unknown_property",
            Self::UnsupportedSpatialProperty(_) => "unsupported_spatial_property",
            Self::MultipleSpatialSources(_) => "multiple_spatial_sources",
            Self::UnsupportedFilter(_) => "unsupported_filter",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::Spatial(_) => "spatial",
        }
    }
}
