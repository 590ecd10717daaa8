// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use super::{Analyzer, Document, Field, StandardAnalyzer};
use crate::catalog::{TermCatalog, ANY_TEXT, CRS, EAST_BOUND, NORTH_BOUND, SOUTH_BOUND, WEST_BOUND};
use crate::metrics;
use crate::model::MetadataRecord;
use crate::resolver::{AccessorRegistry, AttributeSource, PathResolver, ResolveError, NULL_VALUE};
use crate::spatial::{crs, BoundingBox};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns records into [`Document`]s using the term catalog.
#[derive(Debug)]
pub struct DocumentBuilder<S = AccessorRegistry> {
    catalog: Arc<TermCatalog>,
    resolver: PathResolver<S>,
    analyzer: Arc<dyn Analyzer>,
    default_crs: String,
}

impl DocumentBuilder<AccessorRegistry> {
    /// Standard catalog, standard accessors, [`StandardAnalyzer`].
    pub fn standard(default_crs: impl Into<String>) -> Self {
        Self::new(
            Arc::new(TermCatalog::standard()),
            PathResolver::standard(),
            Arc::new(StandardAnalyzer),
            default_crs,
        )
    }
}

impl<S: AttributeSource> DocumentBuilder<S> {
    pub fn new(
        catalog: Arc<TermCatalog>,
        resolver: PathResolver<S>,
        analyzer: Arc<dyn Analyzer>,
        default_crs: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            analyzer,
            default_crs: default_crs.into(),
        }
    }

    pub fn catalog(&self) -> &Arc<TermCatalog> {
        &self.catalog
    }

    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Builds the document for one record.
    ///
    /// Unset terms are stored as `null`. Unusable bounding-box values are
    /// logged and dropped; the document is still produced. The only error
    /// is a path ending on a structured object.
    pub fn build(&self, record: &dyn MetadataRecord) -> Result<Document, ResolveError> {
        let kind = record.kind();
        let mut document = Document::new(record.identifier(), kind);
        let mut any_text = Vec::new();

        for term in self.catalog.active_terms(kind) {
            let resolved = self.resolver.resolve_values(term.paths(), record)?;
            let value = if resolved.is_empty() {
                NULL_VALUE.to_string()
            } else {
                resolved.join(",")
            };
            if term.aggregated() && value != NULL_VALUE {
                any_text.push(value.clone());
            }
            document.insert_field(term.name(), self.field(value));
        }

        let any_text = if any_text.is_empty() {
            NULL_VALUE.to_string()
        } else {
            any_text.join(" ")
        };
        document.insert_field(ANY_TEXT, self.field(any_text));

        for bbox in self.bounding_boxes(&document) {
            document.push_bounding_box(bbox);
        }

        metrics::record_document_built(&kind.to_string());
        debug!(
            identifier = %document.identifier(),
            kind = %kind,
            bounding_boxes = document.bounding_boxes().len(),
            "Built document"
        );
        Ok(document)
    }

    fn field(&self, value: String) -> Field {
        let tokens = self.analyzer.tokenize(&value);
        Field { value, tokens }
    }

    /// Pairs the i-th value of each coordinate term into the i-th box.
    fn bounding_boxes(&self, document: &Document) -> Vec<BoundingBox> {
        let value = |name: &str| {
            document
                .field(name)
                .map_or(NULL_VALUE, |field| field.value.as_str())
        };
        let raw = [
            value(WEST_BOUND),
            value(EAST_BOUND),
            value(SOUTH_BOUND),
            value(NORTH_BOUND),
        ];
        if raw.iter().all(|v| *v == NULL_VALUE) {
            return Vec::new();
        }

        let parsed: Result<Vec<Vec<f64>>, _> = raw.iter().map(|v| parse_ordinates(v)).collect();
        let [west, east, south, north] = match parsed.as_deref() {
            Ok([w, e, s, n]) if w.len() == e.len() && w.len() == s.len() && w.len() == n.len() => {
                [w, e, s, n]
            }
            _ => {
                warn!(
                    identifier = %document.identifier(),
                    west = raw[0],
                    east = raw[1],
                    south = raw[2],
                    north = raw[3],
                    "Skipping malformed bounding box"
                );
                metrics::record_bbox_rejected();
                return Vec::new();
            }
        };

        let crs_values: Vec<&str> = match value(CRS) {
            NULL_VALUE => Vec::new(),
            v => v.split(',').collect(),
        };

        (0..west.len())
            .map(|i| {
                let name = if crs_values.len() == west.len() {
                    crs_values[i]
                } else {
                    crs_values.first().copied().unwrap_or(self.default_crs.as_str())
                };
                BoundingBox::new(west[i], east[i], south[i], north[i], crs::normalize_crs(name))
            })
            .collect()
    }
}

fn parse_ordinates(value: &str) -> Result<Vec<f64>, std::num::ParseFloatError> {
    value.split(',').map(|part| part.trim().parse::<f64>()).collect()
}
