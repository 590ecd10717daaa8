// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter AST - OGC-style catalog filters
//!
//! Clients build a [`FilterNode`] tree; the translator turns it into a
//! text query plus spatial predicates.
//!
//! # Example
//!
//! ```rust
//! use catalog_index::search::{FilterNode, SortBy};
//!
//! // Title = 'starship trooper' AND Author = 'Timothee Gustave'
//! let filter = FilterNode::equal_to("Title", "starship trooper")
//!     .and(FilterNode::equal_to("Author", "Timothee Gustave"));
//!
//! // records touching a lon/lat window
//! let spatial = FilterNode::bbox("ows:BoundingBox", -10.0, 40.0, 5.0, 55.0, "EPSG:4326");
//!
//! let sort = SortBy::descending("Title");
//! ```

use crate::spatial::{Distance, SpatialKind};
use chrono::{DateTime, NaiveDate, Utc};
use geo_types::{coord, Geometry, Point, Rect};
use std::fmt;

/// Boolean combinator, shared by filters and spatial chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::Not => write!(f, "NOT"),
        }
    }
}

/// Filter literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Boolean(bool),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<NaiveDate> for Literal {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    EqualTo,
    NotEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    LessThan,
    LessThanOrEqualTo,
}

/// `PropertyIsLike` pattern with the client's own markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePattern {
    pub pattern: String,
    pub wildcard: char,
    pub single_char: char,
    pub escape: char,
}

impl LikePattern {
    /// Pattern using `*`, `?` and `\`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self::with_markers(pattern, '*', '?', '\\')
    }

    pub fn with_markers(
        pattern: impl Into<String>,
        wildcard: char,
        single_char: char,
        escape: char,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            wildcard,
            single_char,
            escape,
        }
    }
}

/// Spatial operator operand
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFilter {
    pub kind: SpatialKind,
    pub property: String,
    pub geometry: Geometry<f64>,
    pub crs: String,
    pub distance: Option<Distance>,
}

/// Filter AST node
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// property <op> literal
    Comparison {
        property: String,
        op: ComparisonOp,
        literal: Literal,
    },
    /// property IS NULL
    IsNull { property: String },
    /// property LIKE pattern
    Like {
        property: String,
        pattern: LikePattern,
    },
    /// lower <= property <= upper
    Between {
        property: String,
        lower: Literal,
        upper: Literal,
    },
    /// Spatial operator against a geometry
    Spatial(SpatialFilter),
    /// Boolean combination; `Not` takes exactly one child
    Logical(LogicalOp, Vec<FilterNode>),
    /// Record identifiers
    Id(Vec<String>),
}

impl FilterNode {
    fn comparison(property: impl Into<String>, op: ComparisonOp, literal: impl Into<Literal>) -> Self {
        Self::Comparison {
            property: property.into(),
            op,
            literal: literal.into(),
        }
    }

    pub fn equal_to(property: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::comparison(property, ComparisonOp::EqualTo, literal)
    }

    pub fn not_equal_to(property: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::comparison(property, ComparisonOp::NotEqualTo, literal)
    }

    pub fn greater_than(property: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::comparison(property, ComparisonOp::GreaterThan, literal)
    }

    pub fn greater_than_or_equal_to(property: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::comparison(property, ComparisonOp::GreaterThanOrEqualTo, literal)
    }

    pub fn less_than(property: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::comparison(property, ComparisonOp::LessThan, literal)
    }

    pub fn less_than_or_equal_to(property: impl Into<String>, literal: impl Into<Literal>) -> Self {
        Self::comparison(property, ComparisonOp::LessThanOrEqualTo, literal)
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Self::IsNull {
            property: property.into(),
        }
    }

    pub fn like(property: impl Into<String>, pattern: LikePattern) -> Self {
        Self::Like {
            property: property.into(),
            pattern,
        }
    }

    pub fn between(
        property: impl Into<String>,
        lower: impl Into<Literal>,
        upper: impl Into<Literal>,
    ) -> Self {
        Self::Between {
            property: property.into(),
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub fn spatial(
        kind: SpatialKind,
        property: impl Into<String>,
        geometry: Geometry<f64>,
        crs: impl Into<String>,
    ) -> Self {
        Self::Spatial(SpatialFilter {
            kind,
            property: property.into(),
            geometry,
            crs: crs.into(),
            distance: None,
        })
    }

    /// `BBOX` against an envelope given as lower and upper corners.
    pub fn bbox(
        property: impl Into<String>,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        crs: impl Into<String>,
    ) -> Self {
        let rect = Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y });
        Self::spatial(SpatialKind::BBox, property, Geometry::Rect(rect), crs)
    }

    /// `DWithin` around a point.
    pub fn dwithin(
        property: impl Into<String>,
        x: f64,
        y: f64,
        crs: impl Into<String>,
        distance: Distance,
    ) -> Self {
        Self::Spatial(SpatialFilter {
            kind: SpatialKind::DWithin,
            property: property.into(),
            geometry: Geometry::Point(Point::new(x, y)),
            crs: crs.into(),
            distance: Some(distance),
        })
    }

    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Id(ids.into_iter().map(Into::into).collect())
    }

    pub fn all(children: Vec<FilterNode>) -> Self {
        Self::Logical(LogicalOp::And, children)
    }

    pub fn any(children: Vec<FilterNode>) -> Self {
        Self::Logical(LogicalOp::Or, children)
    }

    /// Combine with AND
    pub fn and(self, other: FilterNode) -> Self {
        match self {
            Self::Logical(LogicalOp::And, mut children) => {
                children.push(other);
                Self::Logical(LogicalOp::And, children)
            }
            node => Self::Logical(LogicalOp::And, vec![node, other]),
        }
    }

    /// Combine with OR
    pub fn or(self, other: FilterNode) -> Self {
        match self {
            Self::Logical(LogicalOp::Or, mut children) => {
                children.push(other);
                Self::Logical(LogicalOp::Or, children)
            }
            node => Self::Logical(LogicalOp::Or, vec![node, other]),
        }
    }

    /// Negate
    pub fn negate(self) -> Self {
        Self::Logical(LogicalOp::Not, vec![self])
    }
}

/// Requested result ordering
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortBy {
    pub property: String,
    pub ascending: bool,
}

impl SortBy {
    pub fn ascending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: true,
        }
    }

    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_flattens() {
        let filter = FilterNode::equal_to("Title", "a")
            .and(FilterNode::equal_to("Title", "b"))
            .and(FilterNode::is_null("Abstract"));
        match filter {
            FilterNode::Logical(LogicalOp::And, children) => assert_eq!(children.len(), 3),
            _ => panic!("Expected And node"),
        }
    }

    #[test]
    fn test_or_of_and_stays_nested() {
        let filter = FilterNode::equal_to("a", "1")
            .and(FilterNode::equal_to("b", "2"))
            .or(FilterNode::equal_to("c", "3"));
        match filter {
            FilterNode::Logical(LogicalOp::Or, children) => {
                assert!(matches!(children[0], FilterNode::Logical(LogicalOp::And, _)));
            }
            _ => panic!("Expected Or node"),
        }
    }

    #[test]
    fn test_negate_wraps_single_child() {
        match FilterNode::equal_to("a", "1").negate() {
            FilterNode::Logical(LogicalOp::Not, children) => assert_eq!(children.len(), 1),
            _ => panic!("Expected Not node"),
        }
    }

    #[test]
    fn test_bbox_normalizes_corners() {
        match FilterNode::bbox("BoundingBox", 5.0, 5.0, -5.0, -5.0, "EPSG:4326") {
            FilterNode::Spatial(SpatialFilter {
                kind,
                geometry: Geometry::Rect(rect),
                ..
            }) => {
                assert_eq!(kind, SpatialKind::BBox);
                assert_eq!(rect.min().x, -5.0);
            }
            _ => panic!("Expected Spatial node"),
        }
    }

    #[test]
    fn test_literal_conversions() {
        assert_eq!(Literal::from("x"), Literal::Text("x".into()));
        assert_eq!(Literal::from(3_i64), Literal::Integer(3));
        assert_eq!(Literal::from(true), Literal::Boolean(true));
    }
}
