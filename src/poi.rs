//! Points of interest: extraction and spatial queries.
//!
//! `Point` features carry descriptive properties (`name`, `type`, `desc`).
//! The index answers the queries the surrounding UI needs: POIs inside a
//! bounding box (a selected segment's extent) and filtering by category and
//! name substring.

use geojson::Feature;
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::{Bbox, CanonicalSegment, TrailCollection};

/// A point of interest extracted from a `Point` feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Display name; may be empty when the source data has none
    pub name: String,
    /// Category tag ("water", "camping", ...), as authored
    pub kind: Option<String>,
    pub description: Option<String>,
    pub lon: f64,
    pub lat: f64,
}

impl RTreeObject for Poi {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lon, self.lat])
    }
}

/// Spatial index over a trail collection's POIs.
pub struct PoiIndex {
    tree: RTree<Poi>,
}

impl Default for PoiIndex {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl PoiIndex {
    /// Build the index from a collection's `Point` features.
    pub fn from_collection(collection: &TrailCollection) -> Self {
        let pois: Vec<Poi> = collection
            .points()
            .map(|(feature, point)| Poi {
                name: string_prop(feature, "name").unwrap_or_default(),
                kind: string_prop(feature, "type"),
                description: string_prop(feature, "desc"),
                lon: point.x(),
                lat: point.y(),
            })
            .collect();

        Self {
            tree: RTree::bulk_load(pois),
        }
    }

    /// Number of indexed POIs.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Iterate all POIs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Poi> {
        self.tree.iter()
    }

    /// POIs inside a bounding box.
    pub fn in_bbox(&self, bbox: &Bbox) -> Vec<&Poi> {
        let envelope = AABB::from_corners(
            [bbox.min_lon, bbox.min_lat],
            [bbox.max_lon, bbox.max_lat],
        );
        self.tree.locate_in_envelope(&envelope).collect()
    }

    /// POIs inside a segment's bounding box.
    ///
    /// A segment without a bbox (degenerate geometry only) has no POIs.
    pub fn for_segment(&self, segment: &CanonicalSegment) -> Vec<&Poi> {
        match &segment.bbox {
            Some(bbox) => self.in_bbox(bbox),
            None => Vec::new(),
        }
    }

    /// Filter POIs by category and/or case-insensitive name substring.
    ///
    /// `None` (or a blank string) means "no filter" for that dimension.
    pub fn matching(&self, kind: Option<&str>, query: Option<&str>) -> Vec<&Poi> {
        let kind = kind.map(str::trim).filter(|k| !k.is_empty());
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        self.tree
            .iter()
            .filter(|poi| match kind {
                Some(k) => poi.kind.as_deref() == Some(k),
                None => true,
            })
            .filter(|poi| match &query {
                Some(q) => poi.name.to_lowercase().contains(q.as_str()),
                None => true,
            })
            .collect()
    }
}

fn string_prop(feature: &Feature, key: &str) -> Option<String> {
    feature
        .property(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
