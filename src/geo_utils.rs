//! Geographic utilities: geodesic length and bounding boxes.
//!
//! Thin wrappers over the `geo` crate that the indexer treats as its
//! geometry collaborators. Lengths are haversine (great-circle) and reported
//! in kilometers; bounding boxes use GeoJSON axis order (lon/lat).

use geo::{BoundingRect, HaversineLength, LineString};

use crate::Bbox;

/// Geodesic length of a line in kilometers.
///
/// A degenerate line (fewer than two coordinates) has length zero.
pub fn line_length_km(line: &LineString<f64>) -> f64 {
    line.haversine_length() / 1000.0
}

/// Bounding box of a line in GeoJSON axis order.
///
/// Returns `None` for degenerate lines (fewer than two coordinates), which
/// contribute no bbox to segment or overall aggregation.
pub fn line_bbox(line: &LineString<f64>) -> Option<Bbox> {
    if line.0.len() < 2 {
        return None;
    }
    line.bounding_rect().map(|rect| Bbox {
        min_lon: rect.min().x,
        min_lat: rect.min().y,
        max_lon: rect.max().x,
        max_lat: rect.max().y,
    })
}
