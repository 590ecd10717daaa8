// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Property-based tests for filter translation and query evaluation.
//!
//! Uses proptest to generate random corpora and filter trees and checks the
//! set algebra of the results: NOT complements, AND narrows and commutes,
//! descending sort reverses ascending. Arbitrary filters must translate to
//! a query or a clean error, never a panic.
//!
//! Run with: `cargo test --test proptest_fuzz`

use std::collections::BTreeSet;

use geo_types::{coord, Geometry, Rect};
use proptest::prelude::*;

use catalog_index::model::{DcBoundingBox, DublinCoreRecord, MetadataRecord};
use catalog_index::search::{FilterNode, LikePattern, SortBy};
use catalog_index::spatial::SpatialKind;
use catalog_index::storage::IndexSnapshot;
use catalog_index::{DocumentBuilder, FilterTranslator, QueryExecutor};

const WORDS: &[&str] = &["sea", "ice", "grid", "ctd", "survey", "north"];
const SORTABLE: &[&str] = &["Title", "Subject"];

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// A Dublin Core record with optional title, subject and extent
fn record_strategy() -> impl Strategy<Value = DublinCoreRecord> {
    (
        prop::option::of(prop::sample::subsequence(WORDS, 1..3)),
        prop::option::of(prop::sample::select(WORDS)),
        prop::option::of((-20i32..20, -20i32..20, 1i32..10, 1i32..10)),
    )
        .prop_map(|(title, subject, extent)| {
            let mut record = DublinCoreRecord::default();
            if let Some(words) = title {
                record = record.with_title(words.join(" "));
            }
            if let Some(word) = subject {
                record = record.with_subject(word);
            }
            if let Some((x, y, w, h)) = extent {
                let (x, y) = (f64::from(x), f64::from(y));
                record = record.with_bounding_box(DcBoundingBox::new(
                    x,
                    y,
                    x + f64::from(w),
                    y + f64::from(h),
                ));
            }
            record
        })
}

/// Records with unique identifiers `r0..rN`
fn corpus_strategy() -> impl Strategy<Value = Vec<DublinCoreRecord>> {
    prop::collection::vec(record_strategy(), 1..16).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(n, mut record)| {
                record.identifier = format!("r{n}");
                record
            })
            .collect()
    })
}

/// A single predicate over the properties the corpus populates
fn predicate_strategy() -> impl Strategy<Value = FilterNode> {
    let word = prop::sample::select(WORDS);
    prop_oneof![
        word.clone().prop_map(|w| FilterNode::equal_to("Title", w)),
        word.clone().prop_map(|w| FilterNode::not_equal_to("Subject", w)),
        word.clone().prop_map(|w| FilterNode::like("Title", LikePattern::new(format!("{w}*")))),
        Just(FilterNode::is_null("Subject")),
        (word.clone(), word).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            FilterNode::between("Subject", lo, hi)
        }),
        (-25i32..25, -25i32..25, 1i32..20).prop_map(|(x, y, size)| {
            let (x, y) = (f64::from(x), f64::from(y));
            let size = f64::from(size);
            FilterNode::bbox("BoundingBox", x, y, x + size, y + size, "EPSG:4326")
        }),
    ]
}

/// Arbitrary filter trees, including names and shapes that must be rejected
fn arbitrary_filter_strategy() -> impl Strategy<Value = FilterNode> {
    let property = prop_oneof![
        Just("Title".to_string()),
        Just("BoundingBox".to_string()),
        Just("dc:subject".to_string()),
        "[a-zA-Z:/@]{0,12}",
    ];
    let leaf = prop_oneof![
        (property.clone(), ".{0,12}").prop_map(|(p, v)| FilterNode::equal_to(p, v)),
        (property.clone(), ".{0,12}").prop_map(|(p, v)| FilterNode::not_equal_to(p, v)),
        (property.clone(), ".{0,12}").prop_map(|(p, v)| FilterNode::like(p, LikePattern::new(v))),
        (property.clone(), any::<i64>(), any::<i64>()).prop_map(|(p, a, b)| FilterNode::between(p, a, b)),
        property.clone().prop_map(|p| FilterNode::is_null(p)),
        prop::collection::vec(".{0,8}", 0..4).prop_map(|ids: Vec<String>| FilterNode::ids(ids)),
        (property, -180.0f64..180.0, -90.0f64..90.0).prop_map(|(p, x, y)| {
            let rect = Rect::new(coord! { x: x, y: y }, coord! { x: x + 1.0, y: y + 1.0 });
            FilterNode::spatial(SpatialKind::Intersects, p, Geometry::Rect(rect), "EPSG:4326")
        }),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(FilterNode::all),
            prop::collection::vec(inner.clone(), 0..4).prop_map(FilterNode::any),
            inner.prop_map(FilterNode::negate),
        ]
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn snapshot(corpus: &[DublinCoreRecord]) -> IndexSnapshot {
    let builder = DocumentBuilder::standard("EPSG:4326");
    let stored = corpus
        .iter()
        .enumerate()
        .map(|(n, record)| {
            let document = builder.build(record as &dyn MetadataRecord).unwrap();
            (n as u64, document)
        })
        .collect();
    IndexSnapshot::from_stored(1, stored)
}

fn run(snapshot: &IndexSnapshot, filter: Option<&FilterNode>, sort: Option<&SortBy>) -> Vec<String> {
    let query = FilterTranslator::default().translate(filter, sort).unwrap();
    QueryExecutor::standard().search(snapshot, &query).unwrap()
}

fn set(ids: Vec<String>) -> BTreeSet<String> {
    ids.into_iter().collect()
}

// =============================================================================
// Set Algebra Tests
// =============================================================================

proptest! {
    /// NOT P and P partition the corpus
    #[test]
    fn prop_not_complements(corpus in corpus_strategy(), predicate in predicate_strategy()) {
        let snapshot = snapshot(&corpus);
        let matched = set(run(&snapshot, Some(&predicate), None));
        let negated = set(run(&snapshot, Some(&predicate.clone().negate()), None));

        prop_assert!(matched.is_disjoint(&negated));
        let union: BTreeSet<String> = matched.union(&negated).cloned().collect();
        let everything = set(run(&snapshot, None, None));
        prop_assert_eq!(union, everything);
    }

    /// A AND B is a subset of both and does not depend on operand order
    #[test]
    fn prop_and_commutes_and_narrows(
        corpus in corpus_strategy(),
        a in predicate_strategy(),
        b in predicate_strategy(),
    ) {
        let snapshot = snapshot(&corpus);
        let ab = set(run(&snapshot, Some(&a.clone().and(b.clone())), None));
        let ba = set(run(&snapshot, Some(&b.clone().and(a.clone())), None));

        prop_assert_eq!(&ab, &ba);
        prop_assert!(ab.is_subset(&set(run(&snapshot, Some(&a), None))));
        prop_assert!(ab.is_subset(&set(run(&snapshot, Some(&b), None))));
    }

    /// Descending sort is the exact reversal of ascending sort
    #[test]
    fn prop_sort_reverses(corpus in corpus_strategy(), property in prop::sample::select(SORTABLE)) {
        let snapshot = snapshot(&corpus);
        let ascending = run(&snapshot, None, Some(&SortBy::ascending(property)));
        let mut descending = run(&snapshot, None, Some(&SortBy::descending(property)));

        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    /// Equality on a word returns exactly the records whose title is that word
    #[test]
    fn prop_equality_matches_exact_set(corpus in corpus_strategy(), word in prop::sample::select(WORDS)) {
        let snapshot = snapshot(&corpus);
        let found = set(run(&snapshot, Some(&FilterNode::equal_to("Subject", word)), None));
        let expected: BTreeSet<String> = corpus
            .iter()
            .filter(|r| r.subject.iter().any(|s| s == word))
            .map(|r| r.identifier.clone())
            .collect();
        prop_assert_eq!(found, expected);
    }

    /// Equality on a multi-word title skips titles that only contain it
    #[test]
    fn prop_title_equality_is_whole_value(
        corpus in corpus_strategy(),
        words in prop::sample::subsequence(WORDS, 1..3),
    ) {
        let snapshot = snapshot(&corpus);
        let value = words.join(" ");
        let found = set(run(&snapshot, Some(&FilterNode::equal_to("Title", value.as_str())), None));
        let expected: BTreeSet<String> = corpus
            .iter()
            .filter(|r| r.title == [value.clone()])
            .map(|r| r.identifier.clone())
            .collect();
        prop_assert_eq!(found, expected);
    }
}

// =============================================================================
// Robustness Tests
// =============================================================================

proptest! {
    /// Translation of arbitrary filters never panics
    #[test]
    fn fuzz_translate_never_panics(filter in arbitrary_filter_strategy()) {
        let _ = FilterTranslator::default().translate(Some(&filter), None);
    }

    /// Whatever translates also executes without panicking
    #[test]
    fn fuzz_translated_queries_execute(corpus in corpus_strategy(), filter in arbitrary_filter_strategy()) {
        let snapshot = snapshot(&corpus);
        if let Ok(query) = FilterTranslator::default().translate(Some(&filter), None) {
            let _ = QueryExecutor::standard().search(&snapshot, &query);
        }
    }

    /// Sort property names outside the catalog are rejected, not ignored
    #[test]
    fn fuzz_sort_property(property in "[a-zA-Z]{0,16}") {
        let sort = SortBy::ascending(property);
        let _ = FilterTranslator::default().translate(None, Some(&sort));
    }
}
