//! # Trail Indexer
//!
//! Segment indexing, canonical renumbering and metadata remapping for
//! interactive trail maps.
//!
//! This library provides:
//! - Per-segment length and bounding-box statistics over GeoJSON trail data
//! - A canonical north-to-south segment numbering with a raw -> canonical map
//! - Remapping of feature tags and hand-authored segment metadata
//! - POI spatial queries and map-style expression building
//!
//! ## Features
//!
//! - **`parallel`** - Parallel per-feature measurement with rayon
//! - **`http`** - HTTP client for fetching trail GeoJSON
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use trail_indexer::{compute_indexes, remap_trail_features, TrailCollection};
//!
//! let json = r#"{ "type": "FeatureCollection", "features": [
//!     { "type": "Feature",
//!       "geometry": { "type": "LineString", "coordinates": [[35.5, 32.3], [35.5, 32.4]] },
//!       "properties": { "segment": 4 } }
//! ] }"#;
//!
//! let mut trail = TrailCollection::from_json(json).unwrap();
//! let indexes = compute_indexes(&trail);
//! remap_trail_features(&mut trail, &indexes.segment_map);
//!
//! // The single segment becomes canonical segment 1, whatever its raw id.
//! assert_eq!(indexes.segment_map[&4], 1);
//! assert!(indexes.total_km > 0.0);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TrailIndexError};

// Trail feature collection handling (GeoJSON input)
pub mod features;
pub use features::{coerce_segment_value, TrailCollection, UNATTRIBUTED_SEGMENT};

// Geographic utilities (length, bounding boxes)
pub mod geo_utils;

// Segment indexing (statistics + canonical renumbering)
pub mod indexer;
pub use indexer::compute_indexes;

// Remapping of feature tags and static metadata
pub mod remap;
pub use remap::{remap_segment_meta, remap_trail_features};

// Hand-authored segment metadata table
pub mod meta;
pub use meta::{load_meta_table, CanonicalSegmentMeta, Contact, Lodging, SegmentMeta};

// POI extraction and spatial index
pub mod poi;
pub use poi::{Poi, PoiIndex};

// Palette / mode configuration and map-style expressions
pub mod style;
pub use style::{
    format_km, highlight_filter, poi_filter, trail_color_expression, MapView, ModeConfig, Palette,
    TrailMode,
};

// Stateful trail engine (per-load state, singleton)
pub mod engine;
pub use engine::{with_engine, LoadSummary, SegmentDetail, TrailEngine, ENGINE};

// HTTP module for trail data fetching
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::{FetchConfig, TrailFetcher};

// ============================================================================
// Core Types
// ============================================================================

/// Bounding box in GeoJSON axis order: `[min_lon, min_lat, max_lon, max_lat]`.
///
/// When present, `min <= max` holds on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bbox {
    /// Create a bounding box from its corners.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Component-wise union of two boxes.
    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    /// The northernmost latitude of the box (the renumbering sort key).
    pub fn north_lat(&self) -> f64 {
        self.max_lat
    }

    /// Center of the box as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// GeoJSON bbox array form.
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Build from a GeoJSON bbox array.
    pub fn from_array(bbox: [f64; 4]) -> Self {
        Self::new(bbox[0], bbox[1], bbox[2], bbox[3])
    }
}

/// Aggregated statistics for one raw segment id.
///
/// `length_km` accumulates the geodesic length of every `LineString`
/// sharing the raw id; `bbox` is the union of their bounding boxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentStats {
    pub raw_segment: i64,
    pub length_km: f64,
    pub bbox: Option<Bbox>,
}

/// A segment with its canonical (north-to-south) number assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalSegment {
    /// The segment id as authored in source data
    pub raw_segment: i64,
    /// 1-based canonical number, northernmost segment first
    pub canonical: u32,
    /// Total geodesic length in kilometers
    pub length_km: f64,
    /// Union of the segment's feature bounding boxes
    pub bbox: Option<Bbox>,
    /// Sort key: the bbox max latitude, or -inf when no bbox exists
    pub north_lat: f64,
}

/// Mapping from raw segment id to canonical segment number.
///
/// Built once per data load and discarded on the next; never cache it
/// across loads, since new data always renumbers geographically.
pub type SegmentMap = HashMap<i64, u32>;

/// Result of indexing a trail feature collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailIndexes {
    /// Sum of every `LineString`'s length, attributed or not
    pub total_km: f64,
    /// One entry per distinct non-zero raw segment id, canonical order
    pub segments: Vec<CanonicalSegment>,
    /// Union of all `LineString` bounding boxes
    pub overall_bbox: Option<Bbox>,
    /// Number of `Point` features in the collection
    pub point_count: usize,
    /// Raw id -> canonical number, total over `segments`
    pub segment_map: SegmentMap,
}

impl TrailIndexes {
    /// Look up a segment by canonical number.
    pub fn segment(&self, canonical: u32) -> Option<&CanonicalSegment> {
        // Canonical numbers are dense 1..N in sorted order
        self.segments.get(canonical.checked_sub(1)? as usize)
    }
}

// ============================================================================
// Tests
// ============================================================================
