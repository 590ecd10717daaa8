// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index documents.
//!
//! A [`Document`] is the flattened, searchable form of one record: one
//! field per active catalog term, the aggregate [`ANY_TEXT`] field, the
//! discriminator field, and zero or more bounding boxes.
//!
//! Each field keeps two forms. `value` is the untokenized string used for
//! sorting, `null` checks and range comparisons; `tokens` is the analyzed
//! form used for term, phrase and wildcard matching.
//!
//! [`ANY_TEXT`]: crate::catalog::ANY_TEXT

mod analyzer;
mod builder;

pub use analyzer::{Analyzer, StandardAnalyzer};
pub use builder::DocumentBuilder;

use crate::catalog::{DISCRIMINATOR_FIELD, DISCRIMINATOR_VALUE};
use crate::model::RecordKind;
use crate::resolver::NULL_VALUE;
use crate::spatial::BoundingBox;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub value: String,
    pub tokens: Vec<String>,
}

impl Field {
    pub fn is_null(&self) -> bool {
        self.value == NULL_VALUE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    identifier: String,
    kind: RecordKind,
    fields: BTreeMap<String, Field>,
    #[serde(default)]
    bounding_boxes: Vec<BoundingBox>,
}

impl Document {
    pub fn new(identifier: impl Into<String>, kind: RecordKind) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            DISCRIMINATOR_FIELD.to_string(),
            Field {
                value: DISCRIMINATOR_VALUE.to_string(),
                tokens: vec![DISCRIMINATOR_VALUE.to_string()],
            },
        );
        Self {
            identifier: identifier.into(),
            kind,
            fields,
            bounding_boxes: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Field lookup by exact name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn bounding_boxes(&self) -> &[BoundingBox] {
        &self.bounding_boxes
    }

    pub(crate) fn insert_field(&mut self, name: impl Into<String>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    pub(crate) fn push_bounding_box(&mut self, bbox: BoundingBox) {
        self.bounding_boxes.push(bbox);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_discriminator() {
        let doc = Document::new("id-1", RecordKind::DublinCore);
        let field = doc.field(DISCRIMINATOR_FIELD).unwrap();
        assert_eq!(field.value, DISCRIMINATOR_VALUE);
        assert!(!field.is_null());
        assert!(doc.bounding_boxes().is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut doc = Document::new("id-1", RecordKind::Iso19115);
        doc.insert_field(
            "Title",
            Field {
                value: "Rivers".into(),
                tokens: vec!["rivers".into()],
            },
        );
        doc.push_bounding_box(BoundingBox::new(0.0, 1.0, 2.0, 3.0, "EPSG:4326"));

        let bytes = serde_json::to_vec(&doc).unwrap();
        let back: Document = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, doc);
    }
}
