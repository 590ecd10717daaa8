// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Attribute values produced by accessors.

use super::MetadataNode;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Free text with optional per-locale translations.
///
/// Only the default rendition is indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub default: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            translations: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_translation(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.translations.insert(locale.into(), text.into());
        self
    }

    /// Translation for `locale`, falling back to the default text.
    pub fn get(&self, locale: &str) -> &str {
        self.translations
            .get(locale)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default)
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The closed set of value kinds an attribute may yield.
///
/// Borrowed from the record graph; the resolver never clones the record.
#[derive(Clone)]
pub enum AttrValue<'a> {
    Text(Cow<'a, str>),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// Code list or enumeration, rendered by its symbolic name.
    Code(&'static str),
    LocalizedText(&'a LocalizedText),
    /// Locale tag such as `en-GB` or `fre`.
    Locale(&'a str),
    Sequence(Vec<AttrValue<'a>>),
    /// A further object to walk into.
    Node(&'a dyn MetadataNode),
}

impl<'a> AttrValue<'a> {
    pub fn text(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }

    pub fn node<T: MetadataNode>(value: &'a T) -> Self {
        Self::Node(value)
    }

    pub fn nodes<T: MetadataNode>(values: &'a [T]) -> Self {
        Self::Sequence(values.iter().map(|v| Self::Node(v as &dyn MetadataNode)).collect())
    }

    pub fn texts(values: &'a [String]) -> Self {
        Self::Sequence(values.iter().map(|v| Self::text(v)).collect())
    }

    pub fn localized(values: &'a [LocalizedText]) -> Self {
        Self::Sequence(values.iter().map(Self::LocalizedText).collect())
    }

    pub fn locales(values: &'a [String]) -> Self {
        Self::Sequence(values.iter().map(|v| Self::Locale(v)).collect())
    }

    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Self::Sequence(items) if items.is_empty())
    }
}

impl fmt::Debug for AttrValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Self::Integer(v) => f.debug_tuple("Integer").field(v).finish(),
            Self::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
            Self::Date(v) => f.debug_tuple("Date").field(v).finish(),
            Self::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Self::Code(v) => f.debug_tuple("Code").field(v).finish(),
            Self::LocalizedText(v) => f.debug_tuple("LocalizedText").field(v).finish(),
            Self::Locale(v) => f.debug_tuple("Locale").field(v).finish(),
            Self::Sequence(v) => f.debug_tuple("Sequence").field(v).finish(),
            Self::Node(n) => f.debug_tuple("Node").field(&n.type_name()).finish(),
        }
    }
}
