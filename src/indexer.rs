//! Segment indexing: per-segment statistics and canonical renumbering.
//!
//! One pass over the trail's `LineString` features accumulates geodesic
//! length and bounding boxes per raw segment id, then the segments are
//! renumbered north-to-south: the geographically northernmost segment
//! becomes canonical segment 1. The numbering is recomputed from scratch on
//! every data load so it always reflects the current geography, however the
//! raw ids were authored.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use geo::LineString;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::features::UNATTRIBUTED_SEGMENT;
use crate::geo_utils::{line_bbox, line_length_km};
use crate::{Bbox, CanonicalSegment, SegmentMap, SegmentStats, TrailCollection, TrailIndexes};

/// Index a trail feature collection.
///
/// Pure function of its input: computes the total distance, the per-segment
/// statistics table in canonical order, the overall bounding box and the
/// raw -> canonical segment map.
///
/// Unattributed geometry (raw id 0) counts toward `total_km` but is
/// excluded from the segment table and the map. Features with unrecognized
/// or missing geometry are ignored for statistics. Degenerate lines
/// contribute zero length and no bbox without disturbing other features.
///
/// # Example
/// ```
/// use trail_indexer::{compute_indexes, TrailCollection};
///
/// let json = r#"{ "type": "FeatureCollection", "features": [
///     { "type": "Feature",
///       "geometry": { "type": "LineString", "coordinates": [[35.5, 32.3], [35.5, 32.4]] },
///       "properties": { "segment": 2 } },
///     { "type": "Feature",
///       "geometry": { "type": "LineString", "coordinates": [[35.5, 32.5], [35.5, 32.6]] },
///       "properties": { "segment": 8 } }
/// ] }"#;
///
/// let indexes = compute_indexes(&TrailCollection::from_json(json).unwrap());
/// // Raw segment 8 lies further north, so it becomes canonical 1.
/// assert_eq!(indexes.segment_map[&8], 1);
/// assert_eq!(indexes.segment_map[&2], 2);
/// ```
pub fn compute_indexes(collection: &TrailCollection) -> TrailIndexes {
    let mut total_km = 0.0;
    let mut overall_bbox: Option<Bbox> = None;
    // BTreeMap keeps accumulation order independent of hash state
    let mut per_segment: BTreeMap<i64, SegmentStats> = BTreeMap::new();

    for (raw_segment, length_km, bbox) in measure_lines(collection) {
        total_km += length_km;

        let entry = per_segment
            .entry(raw_segment)
            .or_insert_with(|| SegmentStats {
                raw_segment,
                length_km: 0.0,
                bbox: None,
            });
        entry.length_km += length_km;

        if let Some(bb) = bbox {
            entry.bbox = Some(match entry.bbox {
                Some(prev) => prev.union(&bb),
                None => bb,
            });
            overall_bbox = Some(match overall_bbox {
                Some(prev) => prev.union(&bb),
                None => bb,
            });
        }
    }

    let mut segments: Vec<CanonicalSegment> = per_segment
        .into_values()
        .filter(|stats| stats.raw_segment != UNATTRIBUTED_SEGMENT)
        .map(|stats| CanonicalSegment {
            north_lat: stats
                .bbox
                .map(|b| b.north_lat())
                .unwrap_or(f64::NEG_INFINITY),
            raw_segment: stats.raw_segment,
            canonical: 0,
            length_km: stats.length_km,
            bbox: stats.bbox,
        })
        .collect();

    // Northernmost first; ties break by raw id ascending for determinism
    segments.sort_by(|a, b| {
        b.north_lat
            .partial_cmp(&a.north_lat)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.raw_segment.cmp(&b.raw_segment))
    });

    let mut segment_map = SegmentMap::new();
    for (index, segment) in segments.iter_mut().enumerate() {
        segment.canonical = (index + 1) as u32;
        segment_map.insert(segment.raw_segment, segment.canonical);
    }

    TrailIndexes {
        total_km,
        segments,
        overall_bbox,
        point_count: collection.point_count(),
        segment_map,
    }
}

/// Measure every `LineString` feature: raw id, length in km, bbox.
#[cfg(not(feature = "parallel"))]
fn measure_lines(collection: &TrailCollection) -> Vec<(i64, f64, Option<Bbox>)> {
    collection
        .line_strings()
        .map(|(feature, line)| measure_one(TrailCollection::segment_id(feature), &line))
        .collect()
}

/// Measure every `LineString` feature in parallel.
///
/// Results are collected in feature order, so the outcome is identical to
/// the sequential pass.
#[cfg(feature = "parallel")]
fn measure_lines(collection: &TrailCollection) -> Vec<(i64, f64, Option<Bbox>)> {
    let lines: Vec<(i64, LineString<f64>)> = collection
        .line_strings()
        .map(|(feature, line)| (TrailCollection::segment_id(feature), line))
        .collect();

    lines
        .par_iter()
        .map(|(raw_segment, line)| measure_one(*raw_segment, line))
        .collect()
}

fn measure_one(raw_segment: i64, line: &LineString<f64>) -> (i64, f64, Option<Bbox>) {
    (raw_segment, line_length_km(line), line_bbox(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Haversine kilometers per degree of latitude along a meridian.
    const KM_PER_DEG_LAT: f64 = 111.195;

    fn line_feature(segment: Option<i64>, lon: f64, north_lat: f64, length_km: f64) -> String {
        let south_lat = north_lat - length_km / KM_PER_DEG_LAT;
        let props = match segment {
            Some(s) => format!(r#"{{ "segment": {} }}"#, s),
            None => "{}".to_string(),
        };
        format!(
            r#"{{ "type": "Feature",
                  "geometry": {{ "type": "LineString",
                                 "coordinates": [[{lon}, {south_lat}], [{lon}, {north_lat}]] }},
                  "properties": {props} }}"#
        )
    }

    fn collection_of(features: &[String]) -> TrailCollection {
        let json = format!(
            r#"{{ "type": "FeatureCollection", "features": [{}] }}"#,
            features.join(",")
        );
        TrailCollection::from_json(&json).unwrap()
    }

    #[test]
    fn test_north_to_south_scenario() {
        // Raw ids already ordered north to south: numbering is unchanged.
        let trail = collection_of(&[
            line_feature(Some(1), 35.5, 32.9, 2.0),
            line_feature(Some(2), 35.5, 32.5, 3.5),
            line_feature(Some(3), 35.5, 32.0, 1.2),
        ]);
        let indexes = compute_indexes(&trail);

        assert!((indexes.total_km - 6.7).abs() < 0.01, "total {}", indexes.total_km);
        assert_eq!(indexes.segment_map[&1], 1);
        assert_eq!(indexes.segment_map[&2], 2);
        assert_eq!(indexes.segment_map[&3], 3);

        let lengths: Vec<f64> = indexes.segments.iter().map(|s| s.length_km).collect();
        assert!((lengths[0] - 2.0).abs() < 0.01);
        assert!((lengths[1] - 3.5).abs() < 0.01);
        assert!((lengths[2] - 1.2).abs() < 0.01);
    }

    #[test]
    fn test_arbitrary_raw_ids_renumber_geographically() {
        let trail = collection_of(&[
            line_feature(Some(5), 35.5, 32.9, 2.0),
            line_feature(Some(1), 35.5, 32.5, 3.5),
            line_feature(Some(9), 35.5, 32.0, 1.2),
        ]);
        let indexes = compute_indexes(&trail);

        assert_eq!(indexes.segment_map[&5], 1);
        assert_eq!(indexes.segment_map[&1], 2);
        assert_eq!(indexes.segment_map[&9], 3);

        let raws: Vec<i64> = indexes.segments.iter().map(|s| s.raw_segment).collect();
        assert_eq!(raws, vec![5, 1, 9]);
    }

    #[test]
    fn test_unattributed_counts_toward_total_only() {
        let trail = collection_of(&[
            line_feature(Some(1), 35.5, 32.9, 2.0),
            line_feature(None, 35.5, 32.5, 1.0),
        ]);
        let indexes = compute_indexes(&trail);

        assert!((indexes.total_km - 3.0).abs() < 0.01);
        assert_eq!(indexes.segments.len(), 1);
        assert!(!indexes.segment_map.contains_key(&0));
        // Unattributed geometry still stretches the overall bbox
        let overall = indexes.overall_bbox.unwrap();
        assert!(overall.min_lat < 32.5);
    }

    #[test]
    fn test_same_raw_id_accumulates() {
        let trail = collection_of(&[
            line_feature(Some(4), 35.5, 32.9, 2.0),
            line_feature(Some(4), 35.6, 32.7, 1.5),
        ]);
        let indexes = compute_indexes(&trail);

        assert_eq!(indexes.segments.len(), 1);
        let seg = &indexes.segments[0];
        assert!((seg.length_km - 3.5).abs() < 0.01);
        let bbox = seg.bbox.unwrap();
        assert_eq!(bbox.max_lat, 32.9);
        assert_eq!(bbox.max_lon, 35.6);
    }

    #[test]
    fn test_degenerate_line_does_not_corrupt_aggregation() {
        let degenerate = r#"{ "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": [] },
            "properties": { "segment": 2 } }"#
            .to_string();
        let trail = collection_of(&[line_feature(Some(1), 35.5, 32.9, 2.0), degenerate]);
        let indexes = compute_indexes(&trail);

        assert!((indexes.total_km - 2.0).abs() < 0.01);
        assert_eq!(indexes.segments.len(), 2);

        // The degenerate segment exists with zero length, no bbox, sorted last
        let last = indexes.segments.last().unwrap();
        assert_eq!(last.raw_segment, 2);
        assert_eq!(last.length_km, 0.0);
        assert!(last.bbox.is_none());
        assert_eq!(last.north_lat, f64::NEG_INFINITY);
    }

    #[test]
    fn test_unrecognized_geometry_ignored_for_stats() {
        let polygon = r#"{ "type": "Feature",
            "geometry": { "type": "Polygon",
                          "coordinates": [[[35.0, 32.0], [35.1, 32.0], [35.1, 32.1], [35.0, 32.0]]] },
            "properties": { "segment": 3 } }"#
            .to_string();
        let trail = collection_of(&[line_feature(Some(1), 35.5, 32.9, 2.0), polygon]);
        let indexes = compute_indexes(&trail);

        assert_eq!(indexes.segments.len(), 1);
        assert!(!indexes.segment_map.contains_key(&3));
        // The polygon feature is ignored, not erased
        assert_eq!(trail.features().len(), 2);
    }

    #[test]
    fn test_segment_map_is_bijection_onto_dense_range() {
        let trail = collection_of(&[
            line_feature(Some(42), 35.5, 32.9, 1.0),
            line_feature(Some(-3), 35.5, 32.6, 1.0),
            line_feature(Some(7), 35.5, 32.3, 1.0),
            line_feature(Some(100), 35.5, 32.0, 1.0),
        ]);
        let indexes = compute_indexes(&trail);

        let mut canonicals: Vec<u32> = indexes.segment_map.values().copied().collect();
        canonicals.sort_unstable();
        assert_eq!(canonicals, vec![1, 2, 3, 4]);
        assert_eq!(indexes.segment_map.len(), indexes.segments.len());
    }

    #[test]
    fn test_deterministic_on_identical_input() {
        let features = [
            line_feature(Some(5), 35.5, 32.9, 2.0),
            line_feature(Some(1), 35.5, 32.5, 3.5),
            line_feature(Some(9), 35.5, 32.0, 1.2),
        ];
        let a = compute_indexes(&collection_of(&features));
        let b = compute_indexes(&collection_of(&features));

        assert_eq!(a.segment_map, b.segment_map);
        assert_eq!(a.total_km, b.total_km);
        let raws_a: Vec<i64> = a.segments.iter().map(|s| s.raw_segment).collect();
        let raws_b: Vec<i64> = b.segments.iter().map(|s| s.raw_segment).collect();
        assert_eq!(raws_a, raws_b);
    }

    #[test]
    fn test_north_latitude_tie_breaks_by_raw_id() {
        // Two segments ending at the same northern latitude
        let trail = collection_of(&[
            line_feature(Some(8), 35.5, 32.9, 2.0),
            line_feature(Some(2), 35.7, 32.9, 1.0),
        ]);
        let indexes = compute_indexes(&trail);

        assert_eq!(indexes.segment_map[&2], 1);
        assert_eq!(indexes.segment_map[&8], 2);
    }

    #[test]
    fn test_empty_collection() {
        let trail = TrailCollection::from_json(
            r#"{ "type": "FeatureCollection", "features": [] }"#,
        )
        .unwrap();
        let indexes = compute_indexes(&trail);

        assert_eq!(indexes.total_km, 0.0);
        assert!(indexes.segments.is_empty());
        assert!(indexes.segment_map.is_empty());
        assert!(indexes.overall_bbox.is_none());
        assert_eq!(indexes.point_count, 0);
    }
}
