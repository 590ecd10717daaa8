// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Catalog Index
//!
//! Indexing and filter evaluation for geospatial metadata catalogs.
//!
//! ## Architecture
//!
//! Records flow in on one side, identifiers flow out on the other:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Index Layer                           │
//! │  • MetadataRecord (ISO 19115, Dublin Core)                 │
//! │  • TermCatalog: search term → attribute paths              │
//! │  • PathResolver walks paths via a typed accessor registry  │
//! │  • DocumentBuilder: fields, tokens, bounding boxes         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                   (IndexWriter commit, one transaction)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Persisted Index                         │
//! │  • SQLite file (or in-memory store)                        │
//! │  • Immutable snapshot swapped in after each commit         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Search Layer                           │
//! │  • FilterTranslator: FilterNode → SpatialQuery             │
//! │  • QueryExecutor: text query + spatial predicate chain     │
//! │  • SearchCache validated by index generation               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog_index::{CatalogConfig, CatalogEngine};
//! use catalog_index::model::{DcBoundingBox, DublinCoreRecord, MetadataRecord};
//! use catalog_index::search::{FilterNode, SortBy};
//! use catalog_index::spatial::SpatialKind;
//! use geo_types::{Geometry, Rect};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = CatalogConfig {
//!         index_dir: Some("./catalog-index".into()),
//!         ..Default::default()
//!     };
//!     let mut engine = CatalogEngine::new(config);
//!     engine.start().await.expect("Failed to start");
//!
//!     let record = DublinCoreRecord::new("urn:rec:1")
//!         .with_title("90008411.ctd")
//!         .with_bounding_box(DcBoundingBox::new(5.0, 40.0, 9.0, 44.0));
//!     let records: [&dyn MetadataRecord; 1] = [&record];
//!     engine.build_index(records).await.expect("Failed to build");
//!
//!     let area = Geometry::Rect(Rect::new((7.0, 12.0), (20.0, 20.0)));
//!     let filter = FilterNode::equal_to("Title", "90008411.ctd")
//!         .and(FilterNode::spatial(SpatialKind::Intersects, "BoundingBox", area, "EPSG:4326"));
//!     let result = engine
//!         .search(Some(&filter), Some(&SortBy::ascending("Title")))
//!         .expect("Search failed");
//!     println!("{:?}", result.identifiers);
//!
//!     engine.shutdown().await;
//! }
//! ```
//!
//! ## Configuration
//!
//! See [`CatalogConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`coordinator`]: The [`CatalogEngine`] facade
//! - [`model`]: Record traits and the ISO 19115 / Dublin Core record types
//! - [`resolver`]: Attribute paths and the typed accessor registry
//! - [`catalog`]: Search-term vocabularies
//! - [`document`]: Index documents and analyzers
//! - [`spatial`]: Bounding boxes, CRS handling, spatial predicates
//! - [`search`]: Filter translation, text queries, execution, result cache
//! - [`storage`]: Index stores, snapshots, the index handle

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod document;
pub mod error;
pub mod metrics;
pub mod model;
pub mod resolver;
pub mod search;
pub mod spatial;
pub mod storage;

pub use config::CatalogConfig;
pub use coordinator::{BuildStats, CatalogEngine, EngineState, SearchResult, SearchSource};
pub use document::{Document, DocumentBuilder};
pub use error::CatalogError;
pub use search::{FilterNode, FilterTranslator, QueryExecutor, SpatialQuery};
pub use spatial::SpatialPredicateChain;
pub use storage::{IndexHandle, IndexState, IndexStore, CommitStats};
pub use metrics::LatencyTimer;
