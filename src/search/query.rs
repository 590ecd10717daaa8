// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::LogicalOp;
use crate::spatial::SpatialPredicateChain;

/// Sort key resolved to a catalog term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub term: String,
    pub ascending: bool,
}

/// Executable query: text, optional spatial chain, and how they combine.
///
/// | combinator | text empty | meaning                                   |
/// |------------|------------|-------------------------------------------|
/// | None / AND | either     | text ∩ spatial                            |
/// | OR         | no         | text ∪ spatial                            |
/// | OR         | yes        | spatial                                   |
/// | NOT        | either     | corpus \ (text ∩ spatial)                 |
///
/// When `identifiers` is set the rest is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialQuery {
    text_query: String,
    spatial_predicate: Option<SpatialPredicateChain>,
    logical_combinator: Option<LogicalOp>,
    sort: Option<SortSpec>,
    identifiers: Option<Vec<String>>,
}

impl SpatialQuery {
    /// Matches every document.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn text(text_query: impl Into<String>) -> Self {
        Self {
            text_query: text_query.into(),
            ..Self::default()
        }
    }

    /// Direct identifier lookup.
    pub fn identifiers(ids: Vec<String>) -> Self {
        Self {
            identifiers: Some(ids),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_spatial(mut self, chain: SpatialPredicateChain) -> Self {
        self.spatial_predicate = Some(chain);
        self
    }

    #[must_use]
    pub fn with_combinator(mut self, op: Option<LogicalOp>) -> Self {
        self.logical_combinator = op;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    pub fn text_query(&self) -> &str {
        &self.text_query
    }

    pub fn spatial_predicate(&self) -> Option<&SpatialPredicateChain> {
        self.spatial_predicate.as_ref()
    }

    pub fn logical_combinator(&self) -> Option<LogicalOp> {
        self.logical_combinator
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn identifier_set(&self) -> Option<&[String]> {
        self.identifiers.as_deref()
    }
}
