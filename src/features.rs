//! Trail feature collection handling.
//!
//! Wraps a GeoJSON `FeatureCollection` of trail data: `LineString` features
//! are trail segments tagged with a raw `segment` id, `Point` features are
//! points of interest. Features with other or missing geometry types are
//! ignored for statistics but kept in the collection.

use std::path::Path;

use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, GeoJson, JsonValue, Value};

use crate::error::{Result, TrailIndexError};

/// The raw segment id used for unattributed geometry (connector paths,
/// features with no resolvable `segment` tag).
pub const UNATTRIBUTED_SEGMENT: i64 = 0;

/// A GeoJSON trail feature collection.
#[derive(Debug, Clone)]
pub struct TrailCollection {
    collection: FeatureCollection,
}

impl TrailCollection {
    /// Parse trail data from a GeoJSON string.
    ///
    /// The top-level value must be a `FeatureCollection`.
    pub fn from_json(json: &str) -> Result<Self> {
        let geojson: GeoJson = json.parse().map_err(|e: geojson::Error| {
            TrailIndexError::Parse {
                message: e.to_string(),
            }
        })?;

        match geojson {
            GeoJson::FeatureCollection(collection) => Ok(Self { collection }),
            _ => Err(TrailIndexError::Parse {
                message: "expected a FeatureCollection".to_string(),
            }),
        }
    }

    /// Load trail data from a GeoJSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TrailIndexError::Parse {
                message: format!("read {}: {}", path.as_ref().display(), e),
            }
        })?;
        Self::from_json(&json)
    }

    /// All features, in source order.
    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    /// Mutable access to the features (used by the remapper).
    pub fn features_mut(&mut self) -> &mut Vec<Feature> {
        &mut self.collection.features
    }

    /// The underlying feature collection.
    pub fn inner(&self) -> &FeatureCollection {
        &self.collection
    }

    /// Consume the wrapper, yielding a `GeoJson` ready to hand to a map
    /// source.
    pub fn into_geojson(self) -> GeoJson {
        GeoJson::FeatureCollection(self.collection)
    }

    /// Iterate `LineString` features together with their geometry.
    ///
    /// Positions with fewer than two components are dropped; a feature whose
    /// geometry ends up with fewer than two usable coordinates still appears
    /// here (with a degenerate line) so its zero length is counted.
    pub fn line_strings(&self) -> impl Iterator<Item = (&Feature, LineString<f64>)> {
        self.collection.features.iter().filter_map(|feature| {
            match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::LineString(positions)) => {
                    Some((feature, line_from_positions(positions)))
                }
                _ => None,
            }
        })
    }

    /// Iterate `Point` features together with their geometry.
    pub fn points(&self) -> impl Iterator<Item = (&Feature, Point<f64>)> {
        self.collection.features.iter().filter_map(|feature| {
            match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Point(position)) if position.len() >= 2 => {
                    Some((feature, Point::new(position[0], position[1])))
                }
                _ => None,
            }
        })
    }

    /// Number of `Point` features (the POI count pill).
    pub fn point_count(&self) -> usize {
        self.points().count()
    }

    /// The raw segment id of a feature.
    ///
    /// Coerces the `segment` property the way the source data is authored:
    /// numbers truncate to integers, numeric strings parse. Anything else
    /// (absent, null, garbage) maps to [`UNATTRIBUTED_SEGMENT`].
    pub fn segment_id(feature: &Feature) -> i64 {
        coerce_segment_value(feature.property("segment"))
    }
}

/// Coerce a raw `segment` property value to an integer segment id.
pub fn coerce_segment_value(value: Option<&JsonValue>) -> i64 {
    match value {
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(UNATTRIBUTED_SEGMENT),
        Some(JsonValue::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(UNATTRIBUTED_SEGMENT)
        }
        _ => UNATTRIBUTED_SEGMENT,
    }
}

fn line_from_positions(positions: &[Vec<f64>]) -> LineString<f64> {
    LineString::new(
        positions
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| Coord { x: p[0], y: p[1] })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[35.5, 32.3], [35.5, 32.4]] },
                "properties": { "segment": 1 }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[35.5, 32.1], [35.5, 32.2]] },
                "properties": { "segment": "2" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [35.5, 32.35] },
                "properties": { "name": "Spring", "type": "water" }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let collection = TrailCollection::from_json(SAMPLE).unwrap();
        assert_eq!(collection.features().len(), 3);
        assert_eq!(collection.line_strings().count(), 2);
        assert_eq!(collection.point_count(), 1);
    }

    #[test]
    fn test_rejects_non_collection() {
        let result = TrailCollection::from_json(r#"{"type": "Point", "coordinates": [0, 0]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(TrailCollection::from_json("not geojson").is_err());
    }

    #[test]
    fn test_segment_id_coercion() {
        assert_eq!(coerce_segment_value(Some(&json!(3))), 3);
        assert_eq!(coerce_segment_value(Some(&json!(3.7))), 3);
        assert_eq!(coerce_segment_value(Some(&json!("5"))), 5);
        assert_eq!(coerce_segment_value(Some(&json!(" 5 "))), 5);
        assert_eq!(coerce_segment_value(Some(&json!("abc"))), 0);
        assert_eq!(coerce_segment_value(Some(&json!(null))), 0);
        assert_eq!(coerce_segment_value(Some(&json!(true))), 0);
        assert_eq!(coerce_segment_value(None), 0);
    }

    #[test]
    fn test_degenerate_positions_are_dropped() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[35.5], [35.5, 32.2]] },
                "properties": {}
            }]
        }"#;
        let collection = TrailCollection::from_json(json).unwrap();
        let (_, line) = collection.line_strings().next().unwrap();
        assert_eq!(line.0.len(), 1);
    }
}
