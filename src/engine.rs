//! # Trail Engine
//!
//! Stateful holder for everything one data load derives: the remapped
//! feature collection, the segment indexes, the canonical metadata table
//! and the POI index.
//!
//! All of it is rebuilt from scratch on every load (initial boot or a
//! hike/bike mode switch) and nothing survives a reload. In particular the
//! segment map is ephemeral, so new data always renumbers geographically.
//!
//! The load sequence mirrors the surrounding application flow
//! (fetch -> parse -> index -> remap -> render): the engine performs the index
//! and remap steps and exposes the derived state the rendering layer keys
//! by canonical segment number.

use std::sync::Mutex;

use log::info;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    compute_indexes, remap_segment_meta, remap_trail_features, Bbox, CanonicalSegment,
    CanonicalSegmentMeta, Contact, Lodging, PoiIndex, SegmentMap, SegmentMeta, TrailCollection,
    TrailIndexes, TrailMode,
};

/// Summary of one data load (totals for the header display).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub total_km: f64,
    pub segment_count: usize,
    pub point_count: usize,
    pub overall_bbox: Option<Bbox>,
}

/// Everything the detail panel needs for one selected segment: statistics
/// joined with the authored metadata, when any exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDetail {
    pub canonical: u32,
    pub raw_segment: i64,
    pub length_km: f64,
    pub bbox: Option<Bbox>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub lodging: Vec<Lodging>,
    pub contact: Option<Contact>,
    pub poi_count: usize,
}

/// The per-load trail state.
pub struct TrailEngine {
    mode: TrailMode,
    collection: Option<TrailCollection>,
    indexes: Option<TrailIndexes>,
    meta: Vec<CanonicalSegmentMeta>,
    pois: PoiIndex,
}

impl TrailEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self {
            mode: TrailMode::default(),
            collection: None,
            indexes: None,
            meta: Vec::new(),
            pois: PoiIndex::default(),
        }
    }

    /// Load a dataset.
    ///
    /// Discards every derived structure from the previous load, then runs
    /// the full sequence: index, remap the features in place, re-key the
    /// metadata table, build the POI index.
    pub fn load(
        &mut self,
        mode: TrailMode,
        mut collection: TrailCollection,
        meta_table: &[SegmentMeta],
    ) -> LoadSummary {
        self.clear();

        let indexes = compute_indexes(&collection);
        remap_trail_features(&mut collection, &indexes.segment_map);
        self.meta = remap_segment_meta(meta_table, &indexes.segment_map);
        self.pois = PoiIndex::from_collection(&collection);

        let summary = LoadSummary {
            total_km: indexes.total_km,
            segment_count: indexes.segments.len(),
            point_count: indexes.point_count,
            overall_bbox: indexes.overall_bbox,
        };

        info!(
            "[TrailEngine] Loaded {}: {} segments, {:.1} km, {} POIs",
            mode.label(),
            summary.segment_count,
            summary.total_km,
            summary.point_count
        );

        self.mode = mode;
        self.indexes = Some(indexes);
        self.collection = Some(collection);

        summary
    }

    /// Drop all loaded state.
    pub fn clear(&mut self) {
        self.collection = None;
        self.indexes = None;
        self.meta.clear();
        self.pois = PoiIndex::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.indexes.is_some()
    }

    pub fn mode(&self) -> TrailMode {
        self.mode
    }

    /// Total trail distance, attributed or not. Zero when nothing is loaded.
    pub fn total_km(&self) -> f64 {
        self.indexes.as_ref().map(|i| i.total_km).unwrap_or(0.0)
    }

    pub fn overall_bbox(&self) -> Option<Bbox> {
        self.indexes.as_ref().and_then(|i| i.overall_bbox)
    }

    /// The segment table in canonical order.
    pub fn segments(&self) -> &[CanonicalSegment] {
        self.indexes
            .as_ref()
            .map(|i| i.segments.as_slice())
            .unwrap_or(&[])
    }

    /// The current load's raw -> canonical map.
    pub fn segment_map(&self) -> Option<&SegmentMap> {
        self.indexes.as_ref().map(|i| &i.segment_map)
    }

    /// Look up a segment by canonical number.
    pub fn segment(&self, canonical: u32) -> Option<&CanonicalSegment> {
        self.indexes.as_ref().and_then(|i| i.segment(canonical))
    }

    /// The re-keyed metadata table, sorted by segment number.
    pub fn meta(&self) -> &[CanonicalSegmentMeta] {
        &self.meta
    }

    /// Metadata for one segment number, if authored.
    pub fn meta_for(&self, segment: i64) -> Option<&CanonicalSegmentMeta> {
        self.meta.iter().find(|m| m.segment == segment)
    }

    pub fn pois(&self) -> &PoiIndex {
        &self.pois
    }

    /// The remapped feature collection (what the map source renders).
    pub fn collection(&self) -> Option<&TrailCollection> {
        self.collection.as_ref()
    }

    /// Statistics joined with metadata for one segment.
    pub fn segment_detail(&self, canonical: u32) -> Option<SegmentDetail> {
        let segment = self.segment(canonical)?;
        let meta = self.meta_for(canonical as i64);

        Some(SegmentDetail {
            canonical: segment.canonical,
            raw_segment: segment.raw_segment,
            length_km: segment.length_km,
            bbox: segment.bbox,
            title: meta.map(|m| m.title.clone()),
            summary: meta
                .map(|m| m.summary.clone())
                .filter(|s| !s.is_empty()),
            lodging: meta.map(|m| m.lodging.clone()).unwrap_or_default(),
            contact: meta.and_then(|m| m.contact.clone()),
            poi_count: self.pois.for_segment(segment).len(),
        })
    }
}

impl Default for TrailEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Singleton
// ============================================================================

/// Global engine instance.
///
/// Hosts that drive the library through a single shared state (the
/// interactive map application) use this instead of threading an engine
/// through every call site.
pub static ENGINE: Lazy<Mutex<TrailEngine>> = Lazy::new(|| Mutex::new(TrailEngine::new()));

/// Get a lock on the global engine.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut TrailEngine) -> R,
{
    let mut engine = ENGINE.lock().unwrap();
    f(&mut engine)
}
