//! Remapping feature tags and static metadata to canonical numbering.
//!
//! Runs once per data load, after indexing and before anything downstream
//! reads the data, because every consumer (segment list, detail lookups,
//! paint filters) keys by canonical number. Lookup misses are normal states:
//! unattributed geometry and not-yet-documented segments pass through
//! untouched.

use serde_json::Value as JsonValue;

use crate::features::coerce_segment_value;
use crate::meta::{CanonicalSegmentMeta, SegmentMeta};
use crate::{SegmentMap, TrailCollection};

/// Rewrite every feature's `segment` property to its canonical number,
/// in place.
///
/// Features whose raw id has no entry in the map (unattributed or unknown)
/// are left untouched, as are features without a `segment` property.
pub fn remap_trail_features(collection: &mut TrailCollection, segment_map: &SegmentMap) {
    for feature in collection.features_mut() {
        let properties = match feature.properties.as_mut() {
            Some(p) => p,
            None => continue,
        };
        let current = match properties.get("segment") {
            Some(v) => v,
            None => continue,
        };

        let raw = coerce_segment_value(Some(current));
        if let Some(&canonical) = segment_map.get(&raw) {
            properties.insert("segment".to_string(), JsonValue::from(canonical));
        }
    }
}

/// Re-key the static metadata table to canonical numbering.
///
/// Mapped records get `segment` replaced, with the authored key retained
/// under `original_segment`; unmapped records pass through unchanged.
/// Output is sorted ascending by segment number and always has the same
/// length as the input.
pub fn remap_segment_meta(
    table: &[SegmentMeta],
    segment_map: &SegmentMap,
) -> Vec<CanonicalSegmentMeta> {
    let mut remapped: Vec<CanonicalSegmentMeta> = table
        .iter()
        .map(|meta| {
            let (segment, original_segment) = match segment_map.get(&meta.segment) {
                Some(&canonical) => (canonical as i64, Some(meta.segment)),
                None => (meta.segment, None),
            };
            CanonicalSegmentMeta {
                segment,
                original_segment,
                title: meta.title.clone(),
                summary: meta.summary.clone(),
                lodging: meta.lodging.clone(),
                contact: meta.contact.clone(),
            }
        })
        .collect();

    remapped.sort_by_key(|meta| meta.segment);
    remapped
}
