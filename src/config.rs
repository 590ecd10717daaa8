// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for the catalog engine.
//!
//! # Example
//!
//! ```
//! use catalog_index::CatalogConfig;
//!
//! // In-memory index, defaults everywhere else
//! let config = CatalogConfig::default();
//! assert!(config.identifier_keyed);
//! assert_eq!(config.default_crs, "EPSG:4326");
//!
//! // Persisted index without a result cache
//! let config = CatalogConfig {
//!     index_dir: Some("/var/lib/catalog/index".into()),
//!     search_cache_entries: 0,
//!     ..Default::default()
//! };
//! ```

use serde::Deserialize;

/// Configuration for the catalog engine.
///
/// Every field has a default; an empty document deserializes to
/// [`CatalogConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Directory holding `index.db`. `None` keeps the index in memory.
    #[serde(default)]
    pub index_dir: Option<String>,

    /// Index is keyed 1:1 by record identifier, so identifier lookups
    /// skip the search entirely
    #[serde(default = "default_identifier_keyed")]
    pub identifier_keyed: bool,

    /// CRS assumed for extents that do not name one
    #[serde(default = "default_crs")]
    pub default_crs: String,

    /// Cached query results (0 = disabled)
    #[serde(default = "default_search_cache_entries")]
    pub search_cache_entries: usize,

    /// SQLite pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_identifier_keyed() -> bool { true }
fn default_crs() -> String { crate::spatial::crs::WGS84.to_string() }
fn default_search_cache_entries() -> usize { 1000 }
fn default_max_connections() -> u32 { 4 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            index_dir: None,
            identifier_keyed: default_identifier_keyed(),
            default_crs: default_crs(),
            search_cache_entries: default_search_cache_entries(),
            max_connections: default_max_connections(),
        }
    }
}
