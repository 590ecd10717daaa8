// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Axis-aligned record extents and their relations.

use geo::BoundingRect;
use geo_types::{coord, Geometry, Rect};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const EPSILON: f64 = 1e-9;

/// A record's extent in its own CRS. x is longitude/easting, y latitude/northing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub crs: String,
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64, crs: impl Into<String>) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            crs: crs.into(),
        }
    }

    /// Envelope of a query geometry, `None` for empty geometries.
    pub fn from_geometry(geometry: &Geometry<f64>, crs: impl Into<String>) -> Option<Self> {
        let rect = geometry.bounding_rect()?;
        Some(Self::from_rect(rect, crs))
    }

    pub fn from_rect(rect: Rect<f64>, crs: impl Into<String>) -> Self {
        Self::new(rect.min().x, rect.max().x, rect.min().y, rect.max().y, crs)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_x, y: self.min_y },
            coord! { x: self.max_x, y: self.max_y },
        )
    }

    /// Closed-interval overlap: shared edges count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.max_x >= other.max_x
            && self.min_y <= other.min_y
            && self.max_y >= other.max_y
    }

    pub fn within(&self, other: &Self) -> bool {
        other.contains(self)
    }

    pub fn disjoint(&self, other: &Self) -> bool {
        !self.intersects(other)
    }

    pub fn same_extent(&self, other: &Self) -> bool {
        (self.min_x - other.min_x).abs() < EPSILON
            && (self.max_x - other.max_x).abs() < EPSILON
            && (self.min_y - other.min_y).abs() < EPSILON
            && (self.max_y - other.max_y).abs() < EPSILON
    }

    /// Boundaries meet but interiors do not.
    pub fn touches(&self, other: &Self) -> bool {
        if !self.intersects(other) {
            return false;
        }
        let width = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let height = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        width.abs() < EPSILON || height.abs() < EPSILON
    }

    /// Interiors overlap and neither box contains the other.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.intersects(other)
            && !self.touches(other)
            && !self.contains(other)
            && !other.contains(self)
    }

    /// Shortest distance between the two boxes; zero when they intersect.
    ///
    /// Geographic boxes are measured along the sphere in meters, projected
    /// boxes in their own planar units.
    pub fn distance(&self, other: &Self, geographic: bool) -> f64 {
        let (ax, bx) = closest_pair(self.min_x, self.max_x, other.min_x, other.max_x);
        let (ay, by) = closest_pair(self.min_y, self.max_y, other.min_y, other.max_y);
        if geographic {
            haversine_distance(ay, ax, by, bx)
        } else {
            (bx - ax).hypot(by - ay)
        }
    }
}

/// Nearest coordinates of two closed intervals along one axis.
fn closest_pair(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> (f64, f64) {
    if a_max < b_min {
        (a_max, b_min)
    } else if b_max < a_min {
        (a_min, b_max)
    } else {
        let shared = a_min.max(b_min);
        (shared, shared)
    }
}

/// Great-circle distance in meters.
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, MultiPoint};

    fn bbox(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        BoundingBox::new(min_x, max_x, min_y, max_y, "EPSG:4326")
    }

    #[test]
    fn test_intersects_includes_shared_edge() {
        assert!(bbox(0.0, 10.0, 0.0, 10.0).intersects(&bbox(10.0, 20.0, 0.0, 10.0)));
        assert!(!bbox(0.0, 10.0, 0.0, 10.0).intersects(&bbox(10.5, 20.0, 0.0, 10.0)));
    }

    #[test]
    fn test_contains_and_within() {
        let outer = bbox(-20.0, 20.0, -20.0, 20.0);
        let inner = bbox(-5.0, 5.0, -5.0, 5.0);
        assert!(outer.contains(&inner));
        assert!(inner.within(&outer));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_touches_versus_overlaps() {
        let a = bbox(0.0, 10.0, 0.0, 10.0);
        let edge = bbox(10.0, 20.0, 0.0, 10.0);
        let partial = bbox(5.0, 15.0, 5.0, 15.0);
        assert!(a.touches(&edge));
        assert!(!a.overlaps(&edge));
        assert!(a.overlaps(&partial));
        assert!(!a.touches(&partial));
        assert!(!a.overlaps(&bbox(2.0, 3.0, 2.0, 3.0)));
    }

    #[test]
    fn test_equals_and_disjoint() {
        let a = bbox(1.0, 2.0, 3.0, 4.0);
        assert!(a.same_extent(&bbox(1.0, 2.0, 3.0, 4.0)));
        assert!(a.disjoint(&bbox(5.0, 6.0, 5.0, 6.0)));
    }

    #[test]
    fn test_envelope_of_point_and_polygon() {
        let point = Geometry::Point(point!(x: 3.0, y: 4.0));
        let env = BoundingBox::from_geometry(&point, "EPSG:4326").unwrap();
        assert_eq!((env.min_x, env.max_x, env.min_y, env.max_y), (3.0, 3.0, 4.0, 4.0));

        let empty = Geometry::MultiPoint(MultiPoint(Vec::new()));
        assert!(BoundingBox::from_geometry(&empty, "EPSG:4326").is_none());
    }

    #[test]
    fn test_planar_distance() {
        let a = bbox(0.0, 1.0, 0.0, 1.0);
        let b = bbox(4.0, 5.0, 5.0, 6.0);
        assert!((a.distance(&b, false) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(&bbox(0.5, 2.0, 0.5, 2.0), false), 0.0);
    }

    #[test]
    fn test_geographic_distance_one_degree_latitude() {
        let a = bbox(0.0, 0.0, 0.0, 0.0);
        let b = bbox(0.0, 0.0, 1.0, 1.0);
        let meters = a.distance(&b, true);
        assert!((meters - 111_195.0).abs() < 10.0, "got {meters}");
    }

    #[test]
    fn test_rect_round_trip_normalizes_corners() {
        let rect = Rect::new(coord! { x: 5.0, y: 5.0 }, coord! { x: -5.0, y: -5.0 });
        let b = BoundingBox::from_rect(rect, "EPSG:4326");
        assert_eq!(b.min_x, -5.0);
        assert_eq!(b.to_rect().max().y, 5.0);
    }
}
