// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Dublin Core (`csw:Record`) graph.

use super::{metadata_node, AttrValue, MetadataNode, MetadataRecord, RecordKind};
use crate::resolver::AccessorRegistry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A `csw:Record`. Every element except the identifier may repeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DublinCoreRecord {
    pub identifier: String,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(default)]
    pub creator: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
    #[serde(default)]
    pub contributor: Vec<String>,
    #[serde(default)]
    pub date: Vec<NaiveDate>,
    pub modified: Option<NaiveDate>,
    #[serde(default, rename = "type")]
    pub record_type: Vec<String>,
    #[serde(default)]
    pub format: Vec<String>,
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub language: Vec<String>,
    #[serde(default)]
    pub relation: Vec<String>,
    #[serde(default)]
    pub rights: Vec<String>,
    #[serde(default)]
    pub bounding_box: Vec<DcBoundingBox>,
}

impl DublinCoreRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title.push(title.into());
        self
    }

    #[must_use]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator.push(creator.into());
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject.push(subject.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description.push(description.into());
        self
    }

    #[must_use]
    pub fn with_modified(mut self, modified: NaiveDate) -> Self {
        self.modified = Some(modified);
        self
    }

    #[must_use]
    pub fn with_bounding_box(mut self, bbox: DcBoundingBox) -> Self {
        self.bounding_box.push(bbox);
        self
    }
}

/// `ows:BoundingBox`. Corners are kept in their wire form, `"x y"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcBoundingBox {
    pub crs: Option<String>,
    pub lower_corner: String,
    pub upper_corner: String,
}

impl DcBoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            crs: None,
            lower_corner: format!("{min_x} {min_y}"),
            upper_corner: format!("{max_x} {max_y}"),
        }
    }

    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    fn ordinate(corner: &str, axis: usize) -> Option<AttrValue<'_>> {
        corner.split_whitespace().nth(axis).map(AttrValue::text)
    }
}

metadata_node!(DublinCoreRecord, DcBoundingBox);

impl MetadataRecord for DublinCoreRecord {
    fn kind(&self) -> RecordKind {
        RecordKind::DublinCore
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn as_node(&self) -> &dyn MetadataNode {
        self
    }
}

pub(crate) fn register(registry: &mut AccessorRegistry) {
    registry
        .register::<DublinCoreRecord>("identifier", |r| Some(AttrValue::text(&r.identifier)))
        .register::<DublinCoreRecord>("title", |r| Some(AttrValue::texts(&r.title)))
        .register::<DublinCoreRecord>("creator", |r| Some(AttrValue::texts(&r.creator)))
        .register::<DublinCoreRecord>("subject", |r| Some(AttrValue::texts(&r.subject)))
        .register::<DublinCoreRecord>("description", |r| Some(AttrValue::texts(&r.description)))
        .register::<DublinCoreRecord>("publisher", |r| Some(AttrValue::texts(&r.publisher)))
        .register::<DublinCoreRecord>("contributor", |r| Some(AttrValue::texts(&r.contributor)))
        .register::<DublinCoreRecord>("date", |r| {
            Some(AttrValue::Sequence(r.date.iter().copied().map(AttrValue::Date).collect()))
        })
        .register::<DublinCoreRecord>("modified", |r| r.modified.map(AttrValue::Date))
        .register::<DublinCoreRecord>("type", |r| Some(AttrValue::texts(&r.record_type)))
        .register::<DublinCoreRecord>("format", |r| Some(AttrValue::texts(&r.format)))
        .register::<DublinCoreRecord>("source", |r| Some(AttrValue::texts(&r.source)))
        .register::<DublinCoreRecord>("language", |r| Some(AttrValue::locales(&r.language)))
        .register::<DublinCoreRecord>("relation", |r| Some(AttrValue::texts(&r.relation)))
        .register::<DublinCoreRecord>("rights", |r| Some(AttrValue::texts(&r.rights)))
        .register::<DublinCoreRecord>("BoundingBox", |r| Some(AttrValue::nodes(&r.bounding_box)));

    registry
        .register::<DcBoundingBox>("crs", |b| b.crs.as_deref().map(AttrValue::text))
        .register::<DcBoundingBox>("westBoundLongitude", |b| {
            DcBoundingBox::ordinate(&b.lower_corner, 0)
        })
        .register::<DcBoundingBox>("southBoundLatitude", |b| {
            DcBoundingBox::ordinate(&b.lower_corner, 1)
        })
        .register::<DcBoundingBox>("eastBoundLongitude", |b| {
            DcBoundingBox::ordinate(&b.upper_corner, 0)
        })
        .register::<DcBoundingBox>("northBoundLatitude", |b| {
            DcBoundingBox::ordinate(&b.upper_corner, 1)
        });
}
