// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Path specifications.
//!
//! A path is written the way catalog profiles traditionally write them:
//!
//! ```text
//! ISO 19115:MD_Metadata:identificationInfo:citation:date#dateType=creation:date
//! └──── vocabulary prefix ────┘└──────────── hops ─────────────────────────────┘
//! ```
//!
//! `#attr=value` on a hop keeps only the elements whose `attr` equals
//! `value` (case-insensitive).

use crate::model::RecordKind;
use std::fmt;

const ISO_PREFIX: &str = "ISO 19115:MD_Metadata:";
const DUBLIN_CORE_PREFIX: &str = "Catalog Web Service:Record:";

/// Sibling condition attached to a hop.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub attribute: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hop {
    pub name: String,
    pub condition: Option<Condition>,
}

impl Hop {
    fn parse(segment: &str) -> Self {
        if let Some((name, condition)) = segment.split_once('#') {
            if let Some((attribute, expected)) = condition.split_once('=') {
                return Self {
                    name: name.to_string(),
                    condition: Some(Condition {
                        attribute: attribute.to_string(),
                        expected: expected.to_string(),
                    }),
                };
            }
        }
        Self {
            name: segment.to_string(),
            condition: None,
        }
    }
}

/// Parsed, immutable path through a record graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSpec {
    root: Option<RecordKind>,
    hops: Vec<Hop>,
    raw: String,
}

impl PathSpec {
    /// Parses a path. Total: malformed conditions fall back to plain hop names,
    /// which then simply fail to resolve.
    pub fn parse(raw: &str) -> Self {
        let (root, rest) = if let Some(rest) = raw.strip_prefix(ISO_PREFIX) {
            (Some(RecordKind::Iso19115), rest)
        } else if let Some(rest) = raw.strip_prefix(DUBLIN_CORE_PREFIX) {
            (Some(RecordKind::DublinCore), rest)
        } else {
            (None, raw)
        };

        let hops = rest
            .split(':')
            .filter(|segment| !segment.is_empty())
            .map(Hop::parse)
            .collect();

        Self {
            root,
            hops,
            raw: raw.to_string(),
        }
    }

    /// Record kind this path was written for, `None` when unprefixed.
    pub fn root(&self) -> Option<RecordKind> {
        self.root
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this path should be resolved against a record of `kind`.
    pub fn applies_to(&self, kind: RecordKind) -> bool {
        self.root.map_or(true, |root| root == kind)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for PathSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_prefix_is_stripped() {
        let path = PathSpec::parse("ISO 19115:MD_Metadata:identificationInfo:citation:title");
        assert_eq!(path.root(), Some(RecordKind::Iso19115));
        let names: Vec<_> = path.hops().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["identificationInfo", "citation", "title"]);
    }

    #[test]
    fn test_dublin_core_prefix_is_stripped() {
        let path = PathSpec::parse("Catalog Web Service:Record:title");
        assert_eq!(path.root(), Some(RecordKind::DublinCore));
        assert_eq!(path.hops().len(), 1);
        assert!(path.applies_to(RecordKind::DublinCore));
        assert!(!path.applies_to(RecordKind::Iso19115));
    }

    #[test]
    fn test_conditional_hop() {
        let path = PathSpec::parse(
            "ISO 19115:MD_Metadata:identificationInfo:citation:date#dateType=creation:date",
        );
        let hop = &path.hops()[2];
        assert_eq!(hop.name, "date");
        assert_eq!(
            hop.condition,
            Some(Condition {
                attribute: "dateType".into(),
                expected: "creation".into(),
            })
        );
        assert!(path.hops()[3].condition.is_none());
    }

    #[test]
    fn test_condition_without_value_is_plain_name() {
        let path = PathSpec::parse("a:b#c");
        assert_eq!(path.root(), None);
        assert_eq!(path.hops()[1].name, "b#c");
        assert!(path.hops()[1].condition.is_none());
        assert!(path.applies_to(RecordKind::Iso19115));
    }

    #[test]
    fn test_display_keeps_raw_form() {
        let raw = "Catalog Web Service:Record:BoundingBox:crs";
        assert_eq!(PathSpec::from(raw).to_string(), raw);
    }
}
