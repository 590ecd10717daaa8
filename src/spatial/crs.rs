// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Coordinate reference system names and conversions.

use super::{BoundingBox, SpatialError};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

pub const WGS84: &str = "EPSG:4326";
pub const WEB_MERCATOR: &str = "EPSG:3857";

const MERCATOR_RADIUS: f64 = 6_378_137.0;
const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Canonical `EPSG:<code>` form of the many ways a CRS gets written.
///
/// `urn:ogc:def:crs:EPSG::4326`, `http://www.opengis.net/def/crs/EPSG/0/4326`,
/// `CRS:84` and `WGS84` all normalize to `EPSG:4326`. Unrecognised names
/// are trimmed and upper-cased.
pub fn normalize_crs(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    if upper.contains("EPSG") {
        let digits = upper.len() - upper.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        if digits > 0 {
            return format!("EPSG:{}", &upper[upper.len() - digits..]);
        }
    }
    if upper == "WGS84" || upper == "CRS:84" || upper.ends_with("CRS84") {
        return WGS84.to_string();
    }
    upper
}

/// Whether coordinates in `crs` are longitude/latitude degrees.
///
/// EPSG geographic 2D systems live in the 4000 range.
pub fn is_geographic(crs: &str) -> bool {
    normalize_crs(crs)
        .strip_prefix("EPSG:")
        .and_then(|code| code.parse::<u32>().ok())
        .is_some_and(|code| (4000..5000).contains(&code))
}

/// Re-projects record extents into a query's CRS.
pub trait CoordinateTransform: Send + Sync + fmt::Debug {
    fn transform(&self, bbox: &BoundingBox, target_crs: &str) -> Result<BoundingBox, SpatialError>;
}

/// Identity plus WGS84 ⇄ Web Mercator. Anything else is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTransform;

impl CoordinateTransform for BuiltinTransform {
    fn transform(&self, bbox: &BoundingBox, target_crs: &str) -> Result<BoundingBox, SpatialError> {
        let from = normalize_crs(&bbox.crs);
        let to = normalize_crs(target_crs);
        let (min, max) = match (from.as_str(), to.as_str()) {
            (a, b) if a == b => ((bbox.min_x, bbox.min_y), (bbox.max_x, bbox.max_y)),
            (WGS84, WEB_MERCATOR) => (
                to_mercator(bbox.min_x, bbox.min_y),
                to_mercator(bbox.max_x, bbox.max_y),
            ),
            (WEB_MERCATOR, WGS84) => (
                from_mercator(bbox.min_x, bbox.min_y),
                from_mercator(bbox.max_x, bbox.max_y),
            ),
            _ => return Err(SpatialError::UnsupportedTransform { from, to }),
        };
        Ok(BoundingBox::new(min.0, max.0, min.1, max.1, to))
    }
}

fn to_mercator(lng: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE);
    let x = MERCATOR_RADIUS * lng.to_radians();
    let y = MERCATOR_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    (x, y)
}

fn from_mercator(x: f64, y: f64) -> (f64, f64) {
    let lng = (x / MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / MERCATOR_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    (lng, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_variants() {
        for name in [
            "EPSG:4326",
            "epsg:4326",
            "urn:ogc:def:crs:EPSG::4326",
            "urn:ogc:def:crs:EPSG:6.6:4326",
            "http://www.opengis.net/def/crs/EPSG/0/4326",
            "http://www.opengis.net/gml/srs/epsg.xml#4326",
            "CRS:84",
            "urn:ogc:def:crs:OGC:1.3:CRS84",
            " WGS84 ",
        ] {
            assert_eq!(normalize_crs(name), WGS84, "{name}");
        }
        assert_eq!(normalize_crs("urn:ogc:def:crs:EPSG::3857"), WEB_MERCATOR);
        assert_eq!(normalize_crs("local grid"), "LOCAL GRID");
    }

    #[test]
    fn test_geographic_classification() {
        assert!(is_geographic("EPSG:4326"));
        assert!(is_geographic("urn:ogc:def:crs:EPSG::4258"));
        assert!(!is_geographic("EPSG:3857"));
        assert!(!is_geographic("EPSG:27700"));
        assert!(!is_geographic("LOCAL GRID"));
    }

    #[test]
    fn test_identity_keeps_coordinates() {
        let b = BoundingBox::new(1.0, 2.0, 3.0, 4.0, "urn:ogc:def:crs:EPSG::4326");
        let out = BuiltinTransform.transform(&b, "EPSG:4326").unwrap();
        assert_eq!((out.min_x, out.max_x, out.min_y, out.max_y), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(out.crs, WGS84);
    }

    #[test]
    fn test_mercator_round_trip() {
        let b = BoundingBox::new(-10.0, 20.0, -30.0, 40.0, WGS84);
        let merc = BuiltinTransform.transform(&b, WEB_MERCATOR).unwrap();
        assert!((merc.min_x - -1_113_194.9).abs() < 1.0);
        let back = BuiltinTransform.transform(&merc, WGS84).unwrap();
        assert!((back.min_y - -30.0).abs() < 1e-9);
        assert!((back.max_x - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_pair_is_refused() {
        let b = BoundingBox::new(0.0, 1.0, 0.0, 1.0, "EPSG:27700");
        let err = BuiltinTransform.transform(&b, WGS84).unwrap_err();
        assert_eq!(
            err,
            SpatialError::UnsupportedTransform {
                from: "EPSG:27700".into(),
                to: WGS84.into(),
            }
        );
    }
}
