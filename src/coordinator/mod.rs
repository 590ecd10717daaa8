// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Catalog engine coordinator.
//!
//! The [`CatalogEngine`] ties the components together:
//! - [`DocumentBuilder`] turns records into documents
//! - [`IndexHandle`] owns the persisted index and its committed snapshot
//! - [`FilterTranslator`] turns filter trees into spatial queries
//! - [`QueryExecutor`] evaluates them, fronted by a [`SearchCache`]
//!
//! # Lifecycle
//!
//! ```text
//! Created → Open ⇄ Rebuilding → Closed
//! ```
//!
//! # Example
//!
//! ```rust
//! use catalog_index::{CatalogConfig, CatalogEngine, EngineState};
//! use catalog_index::model::{DublinCoreRecord, MetadataRecord};
//! use catalog_index::search::FilterNode;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), catalog_index::CatalogError> {
//! let mut engine = CatalogEngine::new(CatalogConfig::default());
//! assert_eq!(engine.state(), EngineState::Created);
//!
//! engine.start().await?;
//! let record = DublinCoreRecord::new("urn:rec:1").with_title("90008411.ctd");
//! let records: [&dyn MetadataRecord; 1] = [&record];
//! engine.build_index(records).await?;
//!
//! let found = engine.search(Some(&FilterNode::equal_to("Title", "90008411.ctd")), None)?;
//! assert_eq!(found.identifiers, vec!["urn:rec:1".to_string()]);
//!
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod lifecycle;
mod search_api;
mod types;
mod write_api;

pub use search_api::{SearchResult, SearchSource};
pub use types::{BuildStats, EngineState};

use crate::config::CatalogConfig;
use crate::document::{Analyzer, DocumentBuilder};
use crate::error::CatalogError;
use crate::resolver::PathResolver;
use crate::search::{FieldMapping, FilterTranslator, QueryExecutor, SearchCache};
use crate::spatial::{BuiltinTransform, CoordinateTransform};
use crate::storage::{IndexHandle, IndexSnapshot};
use std::sync::Arc;

/// Main entry point: owns the index and serves builds, writes and searches.
///
/// Searches take `&self` and never wait on writers. Writes are serialized
/// by the index writer lock.
pub struct CatalogEngine {
    pub(super) config: CatalogConfig,
    pub(super) builder: DocumentBuilder,
    pub(super) translator: FilterTranslator,
    pub(super) executor: QueryExecutor,
    /// Set by [`start()`](Self::start)
    pub(super) index: Option<IndexHandle>,
    pub(super) cache: SearchCache,
}

impl CatalogEngine {
    /// Create an engine with the standard catalog, analyzer and transforms.
    ///
    /// The engine starts in `Created` state. Call [`start()`](Self::start)
    /// to open the index.
    pub fn new(config: CatalogConfig) -> Self {
        let builder = DocumentBuilder::standard(config.default_crs.clone());
        let translator = FilterTranslator::new(FieldMapping::new(Arc::clone(builder.catalog())));
        let executor = QueryExecutor::new(
            Arc::clone(builder.analyzer()),
            Arc::new(BuiltinTransform),
            config.identifier_keyed,
        );
        let cache = SearchCache::new(config.search_cache_entries);

        Self {
            config,
            builder,
            translator,
            executor,
            index: None,
            cache,
        }
    }

    /// Replace the analyzer used both for indexing and for phrase queries.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.builder = DocumentBuilder::new(
            Arc::clone(self.builder.catalog()),
            PathResolver::standard(),
            Arc::clone(&analyzer),
            self.config.default_crs.clone(),
        );
        self.executor = QueryExecutor::new(
            analyzer,
            self.executor.transform(),
            self.config.identifier_keyed,
        );
        self
    }

    /// Supply reprojection between CRS codes the built-in transform lacks.
    pub fn with_transform(mut self, transform: Arc<dyn CoordinateTransform>) -> Self {
        self.executor = QueryExecutor::new(
            Arc::clone(self.builder.analyzer()),
            transform,
            self.config.identifier_keyed,
        );
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.index
            .as_ref()
            .map_or(EngineState::Created, |index| index.state().into())
    }

    /// The last committed index contents.
    pub fn snapshot(&self) -> Result<Arc<IndexSnapshot>, CatalogError> {
        Ok(self.index()?.snapshot()?)
    }

    pub(super) fn index(&self) -> Result<&IndexHandle, CatalogError> {
        self.index.as_ref().ok_or(CatalogError::NotStarted)
    }
}
