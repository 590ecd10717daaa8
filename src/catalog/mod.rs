// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Queryable term catalog.
//!
//! Every indexed field is a named term with one path per vocabulary.
//! Terms belong to the ISO 19115 vocabulary, the Dublin Core vocabulary,
//! or both; the union is kept in a single ordered table so a term shared by
//! both vocabularies is defined once.
//!
//! | Record kind  | Active terms          |
//! |--------------|-----------------------|
//! | ISO 19115    | ISO ∪ Dublin Core     |
//! | Dublin Core  | Dublin Core           |

mod standard;

use crate::model::RecordKind;
use crate::resolver::PathSpec;
use std::collections::HashMap;

/// Catch-all field built from the Dublin Core terms.
pub const ANY_TEXT: &str = "AnyText";
/// Field present on every document; `metafile:doc` matches everything.
pub const DISCRIMINATOR_FIELD: &str = "metafile";
pub const DISCRIMINATOR_VALUE: &str = "doc";

pub const IDENTIFIER: &str = "Identifier";
pub const WEST_BOUND: &str = "WestBoundLongitude";
pub const EAST_BOUND: &str = "EastBoundLongitude";
pub const NORTH_BOUND: &str = "NorthBoundLatitude";
pub const SOUTH_BOUND: &str = "SouthBoundLatitude";
pub const CRS: &str = "CRS";

/// The four coordinate terms never feed the aggregate field.
pub const BOUNDING_BOX_TERMS: [&str; 4] = [WEST_BOUND, EAST_BOUND, NORTH_BOUND, SOUTH_BOUND];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermDefinition {
    name: String,
    paths: Vec<PathSpec>,
    iso19115: bool,
    dublin_core: bool,
}

impl TermDefinition {
    pub fn new(name: impl Into<String>, paths: &[&str]) -> Self {
        Self {
            name: name.into(),
            paths: paths.iter().map(|p| PathSpec::parse(p)).collect(),
            iso19115: false,
            dublin_core: false,
        }
    }

    #[must_use]
    pub fn iso19115(mut self) -> Self {
        self.iso19115 = true;
        self
    }

    #[must_use]
    pub fn dublin_core(mut self) -> Self {
        self.dublin_core = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[PathSpec] {
        &self.paths
    }

    pub fn in_iso19115(&self) -> bool {
        self.iso19115
    }

    pub fn in_dublin_core(&self) -> bool {
        self.dublin_core
    }

    /// Whether this term is indexed for records of `kind`.
    pub fn active_for(&self, kind: RecordKind) -> bool {
        match kind {
            RecordKind::Iso19115 => self.iso19115 || self.dublin_core,
            RecordKind::DublinCore => self.dublin_core,
        }
    }

    /// Whether this term's value is appended to [`ANY_TEXT`].
    pub fn aggregated(&self) -> bool {
        self.dublin_core && !BOUNDING_BOX_TERMS.contains(&self.name.as_str())
    }
}

/// Ordered, immutable set of term definitions.
#[derive(Debug, Clone)]
pub struct TermCatalog {
    terms: Vec<TermDefinition>,
    by_name: HashMap<String, usize>,
}

impl TermCatalog {
    /// Builds a catalog. A later definition with the same name (compared
    /// case-insensitively) replaces the earlier one in place.
    pub fn new(definitions: impl IntoIterator<Item = TermDefinition>) -> Self {
        let mut terms: Vec<TermDefinition> = Vec::new();
        let mut by_name = HashMap::new();
        for definition in definitions {
            let key = definition.name.to_lowercase();
            match by_name.get(&key) {
                Some(&index) => terms[index] = definition,
                None => {
                    by_name.insert(key, terms.len());
                    terms.push(definition);
                }
            }
        }
        Self { terms, by_name }
    }

    /// The ISO 19115 / Dublin Core queryables.
    pub fn standard() -> Self {
        Self::new(standard::definitions())
    }

    pub fn terms(&self) -> &[TermDefinition] {
        &self.terms
    }

    pub fn active_terms(&self, kind: RecordKind) -> impl Iterator<Item = &TermDefinition> {
        self.terms.iter().filter(move |t| t.active_for(kind))
    }

    /// Case-insensitive lookup.
    pub fn term(&self, name: &str) -> Option<&TermDefinition> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.terms[index])
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for TermCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_has_bounding_box_terms() {
        let catalog = TermCatalog::standard();
        for name in BOUNDING_BOX_TERMS.iter().chain([&CRS, &IDENTIFIER]) {
            let term = catalog.term(name).unwrap();
            assert!(term.in_dublin_core(), "{name} should be shared");
            assert!(term.in_iso19115(), "{name} should be shared");
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = TermCatalog::standard();
        assert_eq!(catalog.term("title").unwrap().name(), "Title");
        assert_eq!(catalog.term("TITLE").unwrap().name(), "Title");
        assert!(catalog.term("NoSuchTerm").is_none());
    }

    #[test]
    fn test_dublin_core_records_see_subset() {
        let catalog = TermCatalog::standard();
        let iso: Vec<_> = catalog.active_terms(RecordKind::Iso19115).collect();
        let dc: Vec<_> = catalog.active_terms(RecordKind::DublinCore).collect();

        assert!(dc.len() < iso.len());
        assert!(dc.iter().all(|t| iso.contains(t)));
        assert!(dc.iter().all(|t| t.name() != "CreationDate"));
        assert!(iso.iter().any(|t| t.name() == "CreationDate"));
    }

    #[test]
    fn test_aggregate_excludes_coordinates() {
        let catalog = TermCatalog::standard();
        assert!(catalog.term("Title").unwrap().aggregated());
        assert!(!catalog.term("CreationDate").unwrap().aggregated());
        for name in BOUNDING_BOX_TERMS {
            assert!(!catalog.term(name).unwrap().aggregated());
        }
    }

    #[test]
    fn test_later_definition_replaces_earlier() {
        let catalog = TermCatalog::new([
            TermDefinition::new("Title", &["Catalog Web Service:Record:title"]).dublin_core(),
            TermDefinition::new("Subject", &["Catalog Web Service:Record:subject"]).dublin_core(),
            TermDefinition::new("title", &["ISO 19115:MD_Metadata:fileIdentifier"]).iso19115(),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.terms()[0].name(), "title");
        assert!(!catalog.terms()[0].in_dublin_core());
    }
}
