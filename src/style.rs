//! Palette and mode configuration, and map-style expression building.
//!
//! The active palette is an explicit value handed to the expression
//! builders together with the segment table; switching between the hike and
//! bike datasets swaps configuration values, never module state. The
//! builders produce plain JSON expression arrays for the map-style layer
//! that consumes them; no rendering happens here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::CanonicalSegment;

/// Sentinel segment number used by the highlight filter when no segment is
/// selected; it matches nothing.
pub const NO_SEGMENT_SENTINEL: i64 = -9999;

/// Which trail dataset the map is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailMode {
    Hike,
    Bike,
}

impl TrailMode {
    pub fn label(&self) -> &'static str {
        match self {
            TrailMode::Hike => "hiking trail",
            TrailMode::Bike => "cycling trail",
        }
    }

    /// The other mode (the mode-toggle button).
    pub fn toggled(&self) -> TrailMode {
        match self {
            TrailMode::Hike => TrailMode::Bike,
            TrailMode::Bike => TrailMode::Hike,
        }
    }
}

impl Default for TrailMode {
    fn default() -> Self {
        TrailMode::Hike
    }
}

/// Color palette for one trail mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Per-canonical-segment line colors
    pub segment_colors: HashMap<u32, String>,
    /// Halo/outline color behind the trail lines
    pub outline: String,
    /// Color for segments without an assigned color
    pub fallback: String,
    /// Selected-segment highlight color
    pub highlight: String,
    pub poi_color: String,
    pub poi_stroke: String,
}

impl Palette {
    /// The hiking palette.
    pub fn hike() -> Self {
        Self {
            segment_colors: color_table(&[
                (1, "#6F7D4E"),
                (2, "#606C38"),
                (3, "#BC6C25"),
                (4, "#DDA25F"),
                (5, "#4F5D2F"),
                (6, "#8C4A1E"),
            ]),
            outline: "#FEFAE1".to_string(),
            fallback: "#606C38".to_string(),
            highlight: "#283518".to_string(),
            poi_color: "#283518".to_string(),
            poi_stroke: "#FEFAE1".to_string(),
        }
    }

    /// The cycling palette.
    pub fn bike() -> Self {
        Self {
            segment_colors: color_table(&[
                (1, "#2F6B8A"),
                (2, "#3B82B4"),
                (3, "#1F8A70"),
                (4, "#4C9F70"),
                (5, "#2563A6"),
                (6, "#1D4E89"),
            ]),
            outline: "#E0F2FE".to_string(),
            fallback: "#3B82B4".to_string(),
            highlight: "#0B3D5C".to_string(),
            poi_color: "#0B3D5C".to_string(),
            poi_stroke: "#E0F2FE".to_string(),
        }
    }

    /// The color for a canonical segment number, or the fallback.
    pub fn color_for(&self, canonical: u32) -> &str {
        self.segment_colors
            .get(&canonical)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

fn color_table(colors: &[(u32, &str)]) -> HashMap<u32, String> {
    colors
        .iter()
        .map(|&(seg, color)| (seg, color.to_string()))
        .collect()
}

/// Per-mode configuration: label, data source and palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub mode: TrailMode,
    pub label: String,
    pub data_url: String,
    pub palette: Palette,
}

impl ModeConfig {
    pub fn for_mode(mode: TrailMode) -> Self {
        match mode {
            TrailMode::Hike => Self {
                mode,
                label: mode.label().to_string(),
                data_url: "./data/trail.geojson".to_string(),
                palette: Palette::hike(),
            },
            TrailMode::Bike => Self {
                mode,
                label: mode.label().to_string(),
                data_url: "./data/trail-bike.geojson".to_string(),
                palette: Palette::bike(),
            },
        }
    }
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// `[lon, lat]`
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [35.5, 32.2],
            zoom: 8.0,
        }
    }
}

// ============================================================================
// Style Expressions
// ============================================================================

/// Line-color expression for the trail layer.
///
/// Branches are generated from the canonical segments actually present, so
/// a trail that grows a seventh segment colors correctly without a config
/// edit. Unattributed geometry and unknown numbers fall back.
pub fn trail_color_expression(palette: &Palette, segments: &[CanonicalSegment]) -> JsonValue {
    if segments.is_empty() {
        return json!(palette.fallback);
    }

    let mut match_expr = vec![json!("match"), json!(["get", "segment"])];
    for segment in segments {
        match_expr.push(json!(segment.canonical));
        match_expr.push(json!(palette.color_for(segment.canonical)));
    }
    match_expr.push(json!(palette.fallback));

    json!([
        "case",
        ["has", "segment"],
        JsonValue::Array(match_expr),
        palette.fallback
    ])
}

/// Filter expression for the highlight layer.
///
/// With no selection the filter matches nothing (sentinel segment number).
pub fn highlight_filter(selected: Option<u32>) -> JsonValue {
    let segment = selected
        .map(|s| s as i64)
        .unwrap_or(NO_SEGMENT_SENTINEL);
    json!([
        "all",
        ["==", ["geometry-type"], "LineString"],
        ["==", ["get", "segment"], segment]
    ])
}

/// Filter expression for the POI layer from optional category and name
/// query.
pub fn poi_filter(kind: Option<&str>, query: Option<&str>) -> JsonValue {
    let mut filters = vec![json!("all"), json!(["==", ["geometry-type"], "Point"])];

    if let Some(kind) = kind.map(str::trim).filter(|k| !k.is_empty()) {
        filters.push(json!(["==", ["get", "type"], kind]));
    }
    if let Some(q) = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
    {
        filters.push(json!([
            ">=",
            ["index-of", q, ["downcase", ["coalesce", ["get", "name"], ""]]],
            0
        ]));
    }

    JsonValue::Array(filters)
}

/// Format a distance for display, one decimal: `"6.7 km"`, or `"—"` for
/// non-finite values (a segment with no stats).
pub fn format_km(km: f64) -> String {
    if !km.is_finite() {
        return "—".to_string();
    }
    format!("{:.1} km", (km * 10.0).round() / 10.0)
}
