// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metadata record model.
//!
//! Records are plain Rust object graphs. Nothing here is discovered at
//! runtime: every type that can appear on a path declares its attributes
//! once, in an [`AccessorRegistry`](crate::resolver::AccessorRegistry),
//! and the resolver walks the graph through those declarations.
//!
//! ```text
//! Metadata ──identificationInfo──▶ [DataIdentification]
//!                                      │
//!                                      └─citation──▶ Citation ──date──▶ [CitationDate]
//!                                                                          ├─ date
//!                                                                          └─ dateType
//! ```

mod dublin_core;
mod iso19115;
mod value;

pub use dublin_core::{DcBoundingBox, DublinCoreRecord};
pub use iso19115::{
    Citation, CitationDate, DataIdentification, DateType, Distribution, Extent, Format,
    GeographicBoundingBox, Keywords, Metadata, ReferenceSystem, ResponsibleParty, Role, ScopeCode,
    TopicCategory,
};
pub use value::{AttrValue, LocalizedText};

pub(crate) use dublin_core::register as register_dublin_core;
pub(crate) use iso19115::register as register_iso19115;

use serde::{Deserialize, Serialize};
use std::any::Any;

/// Root shape of a record graph.
///
/// Path specifications carry the kind they were written for, so a catalog
/// can hold ISO and Dublin Core paths for the same term side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// `MD_Metadata` graphs
    Iso19115,
    /// `csw:Record` graphs
    DublinCore,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iso19115 => write!(f, "ISO19115"),
            Self::DublinCore => write!(f, "DublinCore"),
        }
    }
}

/// Any object that can sit on a resolution path.
pub trait MetadataNode: Any + Send + Sync {
    /// Upcast used by typed accessors to recover the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Name reported when a path ends on this node instead of a value.
    fn type_name(&self) -> &'static str;
}

/// A root record handed to the indexer.
pub trait MetadataRecord: MetadataNode {
    /// Vocabulary of the record graph.
    fn kind(&self) -> RecordKind;

    /// Identifier the document is keyed by.
    fn identifier(&self) -> &str;

    /// The record as a plain node (resolution starts here).
    fn as_node(&self) -> &dyn MetadataNode;
}

/// Implements [`MetadataNode`] for plain structs.
macro_rules! metadata_node {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::model::MetadataNode for $ty {
                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }

                fn type_name(&self) -> &'static str {
                    stringify!($ty)
                }
            }
        )+
    };
}

pub(crate) use metadata_node;
