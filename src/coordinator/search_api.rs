// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search API for CatalogEngine
//!
//! # Architecture
//!
//! ```text
//! search(filter, sort)
//!       │
//!       ├─→ FilterTranslator → SpatialQuery
//!       │
//!       └─→ execute(query)
//!                │
//!                ├─→ Check SearchCache (generation-validated)
//!                │        │
//!                │        └─→ Hit? Return cached identifiers
//!                │
//!                └─→ QueryExecutor over the committed snapshot
//!                         │
//!                         └─→ Cache results with snapshot generation
//! ```

use std::time::Instant;
use tracing::debug;

use crate::error::CatalogError;
use crate::metrics;
use crate::search::{FilterNode, SearchCacheStats, SortBy, SpatialQuery};

use super::CatalogEngine;

/// Search result with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Matching record identifiers, in result order
    pub identifiers: Vec<String>,
    /// Source of results
    pub source: SearchSource,
    /// Index generation the results were computed against
    pub generation: u64,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Where search results came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    /// Evaluated against the index snapshot
    Index,
    /// Results from SearchCache
    Cache,
    /// Identifier-keyed shortcut, no evaluation
    Identifier,
}

impl SearchSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Cache => "cache",
            Self::Identifier => "identifier",
        }
    }
}

impl CatalogEngine {
    // ═══════════════════════════════════════════════════════════════════════════
    // Search API
    // ═══════════════════════════════════════════════════════════════════════════

    /// Search with a filter tree and optional sort.
    ///
    /// A missing filter matches every document. A query carries at most
    /// one spatial predicate chain: a chain from a nested AND/OR is joined
    /// to the rest of the text with the enclosing operator. Filters needing
    /// a second chain, or a negated spatial operand under OR, fail with a
    /// translation error.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use catalog_index::CatalogEngine;
    /// # use catalog_index::search::{FilterNode, SortBy};
    /// # fn example(engine: &CatalogEngine) -> Result<(), catalog_index::CatalogError> {
    /// let filter = FilterNode::equal_to("Title", "starship trooper")
    ///     .and(FilterNode::equal_to("Author", "Timothee Gustave"));
    /// let sort = SortBy::ascending("Title");
    ///
    /// for id in engine.search(Some(&filter), Some(&sort))?.identifiers {
    ///     println!("Found: {id}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip_all)]
    pub fn search(
        &self,
        filter: Option<&FilterNode>,
        sort: Option<&SortBy>,
    ) -> Result<SearchResult, CatalogError> {
        let query = self.translator.translate(filter, sort).inspect_err(|_| {
            metrics::record_search("error");
        })?;
        self.execute(&query)
    }

    /// Evaluate an already translated query.
    #[tracing::instrument(skip_all, fields(text = %query.text_query()))]
    pub fn execute(&self, query: &SpatialQuery) -> Result<SearchResult, CatalogError> {
        let start = Instant::now();
        let snapshot = self.index()?.snapshot()?;
        let generation = snapshot.generation();

        let (identifiers, source) = match self.cache.get(query, generation) {
            Some(identifiers) => {
                debug!(generation, results = identifiers.len(), "Search cache hit");
                metrics::record_search_cache(true);
                (identifiers, SearchSource::Cache)
            }
            None => {
                if self.cache.is_enabled() {
                    metrics::record_search_cache(false);
                }
                let identifiers = self.executor.search(&snapshot, query).inspect_err(|_| {
                    metrics::record_search("error");
                })?;
                self.cache.insert(query, generation, identifiers.clone());
                (identifiers, SearchSource::Index)
            }
        };

        Ok(self.finish(identifiers, source, generation, start))
    }

    /// Documents whose identifier is `identifier`.
    ///
    /// On identifier-keyed indexes this answers without evaluating anything
    /// and without checking that the identifier is indexed.
    #[tracing::instrument(skip(self))]
    pub fn identifier_query(&self, identifier: &str) -> Result<SearchResult, CatalogError> {
        let start = Instant::now();
        let snapshot = self.index()?.snapshot()?;
        let identifiers = self.executor.identifier_query(&snapshot, identifier)?;
        let source = if self.executor.identifier_keyed() {
            SearchSource::Identifier
        } else {
            SearchSource::Index
        };
        Ok(self.finish(identifiers, source, snapshot.generation(), start))
    }

    /// Every indexed identifier, in natural order.
    pub fn all_identifiers(&self) -> Result<Vec<String>, CatalogError> {
        let snapshot = self.index()?.snapshot()?;
        Ok(snapshot.identifiers().map(str::to_string).collect())
    }

    /// Get search cache statistics.
    pub fn search_cache_stats(&self) -> SearchCacheStats {
        let stats = self.cache.stats();
        metrics::set_search_cache_stats(stats.entry_count, stats.hit_rate);
        stats
    }

    /// Clear the search cache.
    pub fn clear_search_cache(&self) {
        self.cache.clear();
    }

    fn finish(
        &self,
        identifiers: Vec<String>,
        source: SearchSource,
        generation: u64,
        start: Instant,
    ) -> SearchResult {
        metrics::record_search("success");
        metrics::record_search_results(identifiers.len());
        metrics::record_search_latency(source.as_str(), start.elapsed());
        debug!(
            source = source.as_str(),
            generation,
            results = identifiers.len(),
            "Search complete"
        );
        SearchResult {
            identifiers,
            source,
            generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::model::{DublinCoreRecord, MetadataRecord};
    use crate::search::TranslateError;

    async fn engine(config: CatalogConfig) -> CatalogEngine {
        let mut engine = CatalogEngine::new(config);
        engine.start().await.unwrap();
        let a = DublinCoreRecord::new("a").with_title("alpha");
        let b = DublinCoreRecord::new("b").with_title("beta");
        let records: [&dyn MetadataRecord; 2] = [&a, &b];
        engine.build_index(records).await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_repeat_search_is_served_from_cache() {
        let engine = engine(CatalogConfig::default()).await;
        let filter = FilterNode::equal_to("Title", "alpha");

        let first = engine.search(Some(&filter), None).unwrap();
        assert_eq!(first.source, SearchSource::Index);
        let second = engine.search(Some(&filter), None).unwrap();
        assert_eq!(second.source, SearchSource::Cache);
        assert_eq!(first.identifiers, second.identifiers);
        assert_eq!(engine.search_cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_write_invalidates_cached_results() {
        let engine = engine(CatalogConfig::default()).await;
        let filter = FilterNode::equal_to("Title", "alpha");
        engine.search(Some(&filter), None).unwrap();

        let c = DublinCoreRecord::new("c").with_title("alpha");
        engine.index_document(&c).await.unwrap();

        let result = engine.search(Some(&filter), None).unwrap();
        assert_eq!(result.source, SearchSource::Index);
        assert_eq!(result.identifiers, vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_disabled_cache() {
        let engine = engine(CatalogConfig {
            search_cache_entries: 0,
            ..Default::default()
        })
        .await;
        let filter = FilterNode::equal_to("Title", "alpha");
        engine.search(Some(&filter), None).unwrap();
        let again = engine.search(Some(&filter), None).unwrap();
        assert_eq!(again.source, SearchSource::Index);
    }

    #[tokio::test]
    async fn test_unknown_property_fails_closed() {
        let engine = engine(CatalogConfig::default()).await;
        let filter = FilterNode::equal_to("NoSuchProperty", "x");
        assert!(matches!(
            engine.search(Some(&filter), None),
            Err(CatalogError::Translate(TranslateError::UnknownProperty(_)))
        ));
    }

    #[tokio::test]
    async fn test_identifier_query_sources() {
        let keyed = engine(CatalogConfig::default()).await;
        let result = keyed.identifier_query("a").unwrap();
        assert_eq!(result.source, SearchSource::Identifier);
        assert_eq!(result.identifiers, vec!["a".to_string()]);

        let unkeyed = engine(CatalogConfig {
            identifier_keyed: false,
            ..Default::default()
        })
        .await;
        let result = unkeyed.identifier_query("b").unwrap();
        assert_eq!(result.source, SearchSource::Index);
        assert_eq!(result.identifiers, vec!["b".to_string()]);
        assert!(unkeyed.identifier_query("zzz").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_all_identifiers_natural_order() {
        let engine = engine(CatalogConfig::default()).await;
        assert_eq!(engine.all_identifiers().unwrap(), vec!["a", "b"]);
        assert_eq!(engine.search(None, None).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_after_shutdown_is_closed() {
        let engine = engine(CatalogConfig::default()).await;
        engine.shutdown().await;
        assert!(engine.search(None, None).unwrap_err().is_closed());
    }
}
