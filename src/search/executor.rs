// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! SpatialQuery evaluation against an index snapshot.
//!
//! ```text
//! identifiers set?  ──yes──▶ requested ids that exist, request order
//!       │ no
//! text query ──parse──▶ candidate ordinals
//!       │ spatial chain?  AND/None: ∩   OR: ∪ (spatial alone if text empty)
//!       │ combinator NOT? complement against every document
//!       ▼
//! sort by field value (or natural order) ──▶ identifiers
//! ```

use super::lucene::{self, quote, Bound, TextQuery};
use super::query::{SortSpec, SpatialQuery};
use super::{LogicalOp, QueryError};
use crate::catalog::{ANY_TEXT, IDENTIFIER};
use crate::document::{Analyzer, Document, Field, StandardAnalyzer};
use crate::spatial::{BuiltinTransform, CoordinateTransform};
use crate::storage::IndexSnapshot;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QueryExecutor {
    analyzer: Arc<dyn Analyzer>,
    transform: Arc<dyn CoordinateTransform>,
    identifier_keyed: bool,
}

impl QueryExecutor {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        transform: Arc<dyn CoordinateTransform>,
        identifier_keyed: bool,
    ) -> Self {
        Self {
            analyzer,
            transform,
            identifier_keyed,
        }
    }

    /// [`StandardAnalyzer`], [`BuiltinTransform`], identifier-keyed.
    pub fn standard() -> Self {
        Self::new(Arc::new(StandardAnalyzer), Arc::new(BuiltinTransform), true)
    }

    pub fn identifier_keyed(&self) -> bool {
        self.identifier_keyed
    }

    pub fn transform(&self) -> Arc<dyn CoordinateTransform> {
        Arc::clone(&self.transform)
    }

    /// Identifiers of matching documents, ordered by the query's sort or
    /// else in natural order.
    pub fn search(
        &self,
        snapshot: &IndexSnapshot,
        query: &SpatialQuery,
    ) -> Result<Vec<String>, QueryError> {
        if let Some(ids) = query.identifier_set() {
            let mut seen = HashSet::with_capacity(ids.len());
            let ordinals = ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .filter_map(|id| snapshot.ordinal(id))
                .collect();
            return Ok(ordered(snapshot, ordinals, query.sort()));
        }

        let text = lucene::parse(query.text_query())?;
        let mut matched = self.evaluate(snapshot, &text)?;

        if let Some(chain) = query.spatial_predicate() {
            let corpus = snapshot
                .documents()
                .enumerate()
                .map(|(ordinal, doc)| (ordinal, doc.bounding_boxes()));
            let spatial = chain.evaluate(corpus, self.transform.as_ref());
            let text_empty = query.text_query().trim().is_empty();
            matched = match query.logical_combinator() {
                Some(LogicalOp::Or) if !text_empty => matched.union(&spatial).copied().collect(),
                _ => matched.intersection(&spatial).copied().collect(),
            };
        }

        if query.logical_combinator() == Some(LogicalOp::Not) {
            matched = (0..snapshot.len()).filter(|i| !matched.contains(i)).collect();
        }

        debug!(
            generation = snapshot.generation(),
            matched = matched.len(),
            "Query evaluated"
        );
        Ok(ordered(snapshot, matched.into_iter().collect(), query.sort()))
    }

    /// Direct lookup of one identifier.
    ///
    /// On an identifier-keyed index this does not search at all: a
    /// well-formed identifier is returned unchanged.
    pub fn identifier_query(
        &self,
        snapshot: &IndexSnapshot,
        identifier: &str,
    ) -> Result<Vec<String>, QueryError> {
        if self.identifier_keyed {
            return Ok(if is_valid_identifier(identifier) {
                vec![identifier.to_string()]
            } else {
                Vec::new()
            });
        }
        let query = SpatialQuery::text(format!("{IDENTIFIER}:{}", quote(identifier)));
        self.search(snapshot, &query)
    }

    fn evaluate(&self, snapshot: &IndexSnapshot, query: &TextQuery) -> Result<BTreeSet<usize>, QueryError> {
        Ok(match query {
            TextQuery::MatchAll => (0..snapshot.len()).collect(),
            TextQuery::Match { field, text } => {
                let phrase = self.analyzer.tokenize(text);
                select(snapshot, field, |f| !f.is_null() && contains_phrase(&f.tokens, &phrase))
            }
            // AnyText aggregates many values, so a phrase may sit anywhere in it
            TextQuery::Phrase { field, text } if field.eq_ignore_ascii_case(ANY_TEXT) => {
                let phrase = self.analyzer.tokenize(text);
                select(snapshot, field, |f| !f.is_null() && contains_phrase(&f.tokens, &phrase))
            }
            TextQuery::Phrase { field, text } => {
                let phrase = self.analyzer.tokenize(text);
                select(snapshot, field, |f| !f.is_null() && !phrase.is_empty() && f.tokens == phrase)
            }
            TextQuery::Null { field } => select(snapshot, field, Field::is_null),
            TextQuery::Wildcard { field, pattern } => {
                let regex = wildcard_regex(pattern)?;
                select(snapshot, field, |f| {
                    !f.is_null()
                        && (regex.is_match(&f.value) || f.tokens.iter().any(|t| regex.is_match(t)))
                })
            }
            TextQuery::Range { field, lower, upper } => {
                select(snapshot, field, |f| !f.is_null() && in_range(&f.value, lower, upper))
            }
            TextQuery::And(parts) => {
                let mut acc: Option<BTreeSet<usize>> = None;
                for part in parts {
                    let hits = self.evaluate(snapshot, part)?;
                    acc = Some(match acc {
                        None => hits,
                        Some(acc) => acc.intersection(&hits).copied().collect(),
                    });
                }
                acc.unwrap_or_else(|| (0..snapshot.len()).collect())
            }
            TextQuery::Or(parts) => {
                let mut acc = BTreeSet::new();
                for part in parts {
                    acc.extend(self.evaluate(snapshot, part)?);
                }
                acc
            }
            TextQuery::AndNot(keep, drop) => {
                let keep = self.evaluate(snapshot, keep)?;
                let drop = self.evaluate(snapshot, drop)?;
                keep.difference(&drop).copied().collect()
            }
            TextQuery::Not(inner) => {
                let inner = self.evaluate(snapshot, inner)?;
                (0..snapshot.len()).filter(|i| !inner.contains(i)).collect()
            }
        })
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::standard()
    }
}

/// Exact field name first, then a case-insensitive match.
fn lookup<'a>(doc: &'a Document, name: &str) -> Option<&'a Field> {
    doc.field(name).or_else(|| {
        doc.fields()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn select(snapshot: &IndexSnapshot, field: &str, accept: impl Fn(&Field) -> bool) -> BTreeSet<usize> {
    snapshot
        .documents()
        .enumerate()
        .filter(|(_, doc)| lookup(doc, field).is_some_and(&accept))
        .map(|(ordinal, _)| ordinal)
        .collect()
}

fn contains_phrase(tokens: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && tokens.windows(phrase.len()).any(|window| window == phrase)
}

fn wildcard_regex(pattern: &str) -> Result<Regex, QueryError> {
    let mut source = String::from("(?is)^");
    let mut buf = [0u8; 4];
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    source.push_str(&regex::escape(next.encode_utf8(&mut buf)));
                }
            }
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    Regex::new(&source).map_err(|e| QueryError::InvalidPattern(e.to_string()))
}

/// Numeric when the value and every given bound parse as numbers,
/// lexicographic otherwise.
fn in_range(value: &str, lower: &Bound, upper: &Bound) -> bool {
    let given = [lower, upper].into_iter().filter_map(|b| match b {
        Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v.as_str()),
        Bound::Unbounded => None,
    });
    let numeric = value
        .parse::<f64>()
        .ok()
        .filter(|_| given.clone().all(|b| b.parse::<f64>().is_ok()));

    let compare = |bound: &str| match numeric {
        Some(v) => bound.parse::<f64>().ok().and_then(|b| v.partial_cmp(&b)),
        None => Some(value.cmp(bound)),
    };

    let lower_ok = match lower {
        Bound::Unbounded => true,
        Bound::Inclusive(b) => matches!(compare(b), Some(Ordering::Greater | Ordering::Equal)),
        Bound::Exclusive(b) => compare(b) == Some(Ordering::Greater),
    };
    let upper_ok = match upper {
        Bound::Unbounded => true,
        Bound::Inclusive(b) => matches!(compare(b), Some(Ordering::Less | Ordering::Equal)),
        Bound::Exclusive(b) => compare(b) == Some(Ordering::Less),
    };
    lower_ok && upper_ok
}

/// Descending is the exact reverse of ascending; ties keep natural order
/// when ascending. Documents without the field sort first.
fn ordered(snapshot: &IndexSnapshot, mut ordinals: Vec<usize>, sort: Option<&SortSpec>) -> Vec<String> {
    if let Some(sort) = sort {
        let key = |ordinal: usize| {
            snapshot
                .document(ordinal)
                .and_then(|doc| lookup(doc, &sort.term))
                .map(|field| field.value.as_str())
        };
        ordinals.sort_by(|a, b| key(*a).cmp(&key(*b)).then(a.cmp(b)));
        if !sort.ascending {
            ordinals.reverse();
        }
    }
    ordinals
        .into_iter()
        .filter_map(|ordinal| snapshot.document(ordinal))
        .map(|doc| doc.identifier().to_string())
        .collect()
}

fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty() && !identifier.chars().any(|c| c.is_whitespace() || c.is_control())
}
