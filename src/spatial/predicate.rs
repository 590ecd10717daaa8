// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Single spatial predicates against record extents.

use super::{crs, BoundingBox, CoordinateTransform, SpatialError};
use geo_types::Geometry;
use std::fmt;
use std::str::FromStr;

const METERS_PER_DEGREE: f64 = 111_319.490_793_273_6;

/// Relation tested between a record extent and the query geometry.
///
/// Read as "record `<kind>` query": `Contains` keeps records whose extent
/// contains the query geometry, `Within` keeps records inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialKind {
    BBox,
    Intersects,
    Contains,
    Within,
    Disjoint,
    Equals,
    Overlaps,
    Touches,
    DWithin,
    Beyond,
}

impl SpatialKind {
    pub fn needs_distance(self) -> bool {
        matches!(self, Self::DWithin | Self::Beyond)
    }
}

impl fmt::Display for SpatialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BBox => "BBOX",
            Self::Intersects => "INTERSECTS",
            Self::Contains => "CONTAINS",
            Self::Within => "WITHIN",
            Self::Disjoint => "DISJOINT",
            Self::Equals => "EQUALS",
            Self::Overlaps => "OVERLAPS",
            Self::Touches => "TOUCHES",
            Self::DWithin => "DWITHIN",
            Self::Beyond => "BEYOND",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceUnit {
    Meters,
    Kilometers,
    Miles,
    Feet,
    NauticalMiles,
    Degrees,
}

impl DistanceUnit {
    fn meters(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1_000.0,
            Self::Miles => 1_609.344,
            Self::Feet => 0.3048,
            Self::NauticalMiles => 1_852.0,
            Self::Degrees => METERS_PER_DEGREE,
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = SpatialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "" | "m" | "meter" | "meters" | "metre" | "metres" => Self::Meters,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometers,
            "mi" | "mile" | "miles" | "statute miles" => Self::Miles,
            "ft" | "foot" | "feet" => Self::Feet,
            "nm" | "nmi" | "nautical miles" => Self::NauticalMiles,
            "deg" | "degree" | "degrees" => Self::Degrees,
            other => return Err(SpatialError::UnknownUnit(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meters)
    }

    pub fn in_meters(&self) -> f64 {
        self.value * self.unit.meters()
    }
}

/// A relation plus the query envelope it is tested against.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialPredicate {
    kind: SpatialKind,
    envelope: BoundingBox,
    distance: Option<Distance>,
}

impl SpatialPredicate {
    /// Builds a predicate from a query geometry. Only the geometry's envelope
    /// is retained, in normalized CRS form.
    pub fn new(kind: SpatialKind, geometry: &Geometry<f64>, crs: &str) -> Result<Self, SpatialError> {
        let envelope = BoundingBox::from_geometry(geometry, crs::normalize_crs(crs))
            .ok_or(SpatialError::EmptyGeometry)?;
        Ok(Self {
            kind,
            envelope,
            distance: None,
        })
    }

    #[must_use]
    pub fn with_distance(mut self, distance: Distance) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn kind(&self) -> SpatialKind {
        self.kind
    }

    pub fn envelope(&self) -> &BoundingBox {
        &self.envelope
    }

    pub fn distance(&self) -> Option<Distance> {
        self.distance
    }

    /// Tests one record extent. Extents in another CRS are converted first;
    /// a conversion failure is returned to the caller.
    pub fn matches(
        &self,
        bbox: &BoundingBox,
        transform: &dyn CoordinateTransform,
    ) -> Result<bool, SpatialError> {
        let converted;
        let record = if crs::normalize_crs(&bbox.crs) == self.envelope.crs {
            bbox
        } else {
            converted = transform.transform(bbox, &self.envelope.crs)?;
            &converted
        };

        let query = &self.envelope;
        Ok(match self.kind {
            SpatialKind::BBox | SpatialKind::Intersects => record.intersects(query),
            SpatialKind::Contains => record.contains(query),
            SpatialKind::Within => record.within(query),
            SpatialKind::Disjoint => record.disjoint(query),
            SpatialKind::Equals => record.same_extent(query),
            SpatialKind::Overlaps => record.overlaps(query),
            SpatialKind::Touches => record.touches(query),
            SpatialKind::DWithin => self.gap(record) <= self.limit(),
            SpatialKind::Beyond => self.gap(record) > self.limit(),
        })
    }

    fn gap(&self, record: &BoundingBox) -> f64 {
        record.distance(&self.envelope, crs::is_geographic(&self.envelope.crs))
    }

    fn limit(&self) -> f64 {
        self.distance.map_or(0.0, |d| d.in_meters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::BuiltinTransform;
    use geo_types::{coord, point, Rect};

    fn query(kind: SpatialKind, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> SpatialPredicate {
        let rect = Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y });
        SpatialPredicate::new(kind, &Geometry::Rect(rect), "EPSG:4326").unwrap()
    }

    fn record(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        BoundingBox::new(min_x, max_x, min_y, max_y, "EPSG:4326")
    }

    #[test]
    fn test_contains_reads_record_contains_query() {
        let p = query(SpatialKind::Contains, -1.0, -1.0, 1.0, 1.0);
        assert!(p.matches(&record(-5.0, 5.0, -5.0, 5.0), &BuiltinTransform).unwrap());
        assert!(!p.matches(&record(0.0, 5.0, 0.0, 5.0), &BuiltinTransform).unwrap());
    }

    #[test]
    fn test_within_reads_record_within_query() {
        let p = query(SpatialKind::Within, -10.0, -10.0, 10.0, 10.0);
        assert!(p.matches(&record(-5.0, 5.0, -5.0, 5.0), &BuiltinTransform).unwrap());
        assert!(!p.matches(&record(-50.0, 5.0, -5.0, 5.0), &BuiltinTransform).unwrap());
    }

    #[test]
    fn test_dwithin_in_kilometers() {
        let p = SpatialPredicate::new(
            SpatialKind::DWithin,
            &Geometry::Point(point!(x: 0.0, y: 0.0)),
            "EPSG:4326",
        )
        .unwrap()
        .with_distance(Distance::new(120.0, DistanceUnit::Kilometers));

        // ~111 km north
        assert!(p.matches(&record(0.0, 0.0, 1.0, 2.0), &BuiltinTransform).unwrap());
        // ~222 km north
        assert!(!p.matches(&record(0.0, 0.0, 2.0, 3.0), &BuiltinTransform).unwrap());
    }

    #[test]
    fn test_beyond_is_strict_complement_of_dwithin() {
        let point = Geometry::Point(point!(x: 0.0, y: 0.0));
        let near = SpatialPredicate::new(SpatialKind::DWithin, &point, "EPSG:4326")
            .unwrap()
            .with_distance(Distance::meters(500_000.0));
        let far = SpatialPredicate::new(SpatialKind::Beyond, &point, "EPSG:4326")
            .unwrap()
            .with_distance(Distance::meters(500_000.0));
        for r in [record(1.0, 2.0, 1.0, 2.0), record(10.0, 11.0, 10.0, 11.0)] {
            let a = near.matches(&r, &BuiltinTransform).unwrap();
            let b = far.matches(&r, &BuiltinTransform).unwrap();
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_record_in_other_crs_is_converted() {
        let p = query(SpatialKind::Intersects, -1.0, -1.0, 1.0, 1.0);
        let merc = BoundingBox::new(-50_000.0, 50_000.0, -50_000.0, 50_000.0, "EPSG:3857");
        assert!(p.matches(&merc, &BuiltinTransform).unwrap());
    }

    #[test]
    fn test_unconvertible_crs_is_error() {
        let p = query(SpatialKind::Intersects, -1.0, -1.0, 1.0, 1.0);
        let odd = BoundingBox::new(0.0, 1.0, 0.0, 1.0, "EPSG:27700");
        assert!(p.matches(&odd, &BuiltinTransform).is_err());
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("KM".parse::<DistanceUnit>().unwrap(), DistanceUnit::Kilometers);
        assert_eq!("".parse::<DistanceUnit>().unwrap(), DistanceUnit::Meters);
        assert!("furlongs".parse::<DistanceUnit>().is_err());
    }
}
