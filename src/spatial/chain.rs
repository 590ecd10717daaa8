// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::{BoundingBox, CoordinateTransform, SpatialPredicate};
use crate::metrics;
use crate::search::LogicalOp;
use std::collections::BTreeSet;
use tracing::warn;

/// Ordered predicates, each tagged with how it combines with everything
/// before it.
///
/// Evaluation is strictly left to right with no precedence:
///
/// ```text
/// result = p0            (complemented against the corpus if tagged NOT)
/// result = result ∩ pi   AND
/// result = result ∪ pi   OR
/// result = result \ pi   NOT
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialPredicateChain {
    entries: Vec<(SpatialPredicate, LogicalOp)>,
}

impl SpatialPredicateChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(predicate: SpatialPredicate) -> Self {
        Self {
            entries: vec![(predicate, LogicalOp::And)],
        }
    }

    pub fn push(&mut self, predicate: SpatialPredicate, op: LogicalOp) {
        self.entries.push((predicate, op));
    }

    pub fn entries(&self) -> &[(SpatialPredicate, LogicalOp)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positions in `corpus` accepted by the chain. A document matches a
    /// predicate when any of its extents does; documents without extents
    /// match nothing.
    pub fn evaluate<'a, I>(&self, corpus: I, transform: &dyn CoordinateTransform) -> BTreeSet<usize>
    where
        I: IntoIterator<Item = (usize, &'a [BoundingBox])>,
    {
        let corpus: Vec<(usize, &[BoundingBox])> = corpus.into_iter().collect();
        let everything: BTreeSet<usize> = corpus.iter().map(|(position, _)| *position).collect();

        let mut result: Option<BTreeSet<usize>> = None;
        for (predicate, op) in &self.entries {
            let matched = matching(predicate, &corpus, transform);
            result = Some(match result {
                None if *op == LogicalOp::Not => everything.difference(&matched).copied().collect(),
                None => matched,
                Some(acc) => match op {
                    LogicalOp::And => acc.intersection(&matched).copied().collect(),
                    LogicalOp::Or => acc.union(&matched).copied().collect(),
                    LogicalOp::Not => acc.difference(&matched).copied().collect(),
                },
            });
        }
        result.unwrap_or(everything)
    }
}

fn matching(
    predicate: &SpatialPredicate,
    corpus: &[(usize, &[BoundingBox])],
    transform: &dyn CoordinateTransform,
) -> BTreeSet<usize> {
    corpus
        .iter()
        .filter(|(_, boxes)| {
            boxes.iter().any(|bbox| match predicate.matches(bbox, transform) {
                Ok(hit) => hit,
                Err(e) => {
                    warn!(crs = %bbox.crs, error = %e, "Treating extent as non-matching");
                    metrics::record_spatial_error();
                    false
                }
            })
        })
        .map(|(position, _)| *position)
        .collect()
}
