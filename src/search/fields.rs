// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use crate::catalog::{TermCatalog, ANY_TEXT};
use std::collections::HashMap;
use std::sync::Arc;

/// What a filter property name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTarget {
    /// Index field with this exact name
    Field(String),
    /// The document's bounding boxes
    Spatial,
}

const EXTRA_ALIASES: &[(&str, &str)] = &[
    ("description", "Abstract"),
    ("keywords", "Subject"),
    ("keyword", "Subject"),
    ("organizationname", "OrganisationName"),
    ("resourceidentifier", "Identifier"),
    ("fileidentifier", "Identifier"),
];

const SPATIAL_ALIASES: &[&str] = &["boundingbox", "bbox", "envelope", "spatial", "geometry"];

/// Alias table from client property names to index fields.
///
/// Lookup is case-insensitive and tolerant of XPath-ish and prefixed names:
/// `dc:title`, `/csw:Record/dc:title`, `@Title` and `TITLE` all reach the
/// `Title` field.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    catalog: Arc<TermCatalog>,
    aliases: HashMap<String, FieldTarget>,
}

impl FieldMapping {
    pub fn new(catalog: Arc<TermCatalog>) -> Self {
        let mut aliases: HashMap<String, FieldTarget> = catalog
            .terms()
            .iter()
            .map(|t| (t.name().to_lowercase(), FieldTarget::Field(t.name().to_string())))
            .collect();
        aliases.insert(ANY_TEXT.to_lowercase(), FieldTarget::Field(ANY_TEXT.to_string()));

        for (alias, term) in EXTRA_ALIASES {
            if let Some(term) = catalog.term(term) {
                aliases
                    .entry((*alias).to_string())
                    .or_insert_with(|| FieldTarget::Field(term.name().to_string()));
            }
        }
        for alias in SPATIAL_ALIASES {
            aliases.insert((*alias).to_string(), FieldTarget::Spatial);
        }
        Self { catalog, aliases }
    }

    /// Adds or replaces an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: &str, target: FieldTarget) -> Self {
        self.aliases.insert(alias.to_lowercase(), target);
        self
    }

    pub fn catalog(&self) -> &Arc<TermCatalog> {
        &self.catalog
    }

    pub fn resolve(&self, property: &str) -> Option<&FieldTarget> {
        let name = property.trim();
        let name = name.rsplit('/').next().unwrap_or(name);
        let name = name.trim_start_matches('@').to_lowercase();
        if let Some(target) = self.aliases.get(&name) {
            return Some(target);
        }
        let (_, local) = name.rsplit_once(':')?;
        self.aliases.get(local)
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::new(Arc::new(TermCatalog::standard()))
    }
}
