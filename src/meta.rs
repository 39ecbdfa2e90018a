//! Hand-authored segment metadata.
//!
//! Titles, narrative summaries and practical extras (lodging, local
//! contacts) are maintained by trail authors in a static table keyed by
//! segment number. Authors write against the raw/previous numbering, so the
//! table must be re-keyed through the segment map on every data load before
//! anything downstream looks records up by canonical number.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrailIndexError};

/// A lodging option along a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lodging {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Local contact for a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

/// A static metadata record for one segment, as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMeta {
    /// Segment number as authored (raw/previous numbering)
    pub segment: i64,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub lodging: Vec<Lodging>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

/// A metadata record after re-keying to canonical numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSegmentMeta {
    /// Canonical segment number, or the authored key when no mapping exists
    pub segment: i64,
    /// The authored key, retained when the record was remapped
    #[serde(default)]
    pub original_segment: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub lodging: Vec<Lodging>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

/// Load a metadata table from its JSON array form.
pub fn load_meta_table(json: &str) -> Result<Vec<SegmentMeta>> {
    serde_json::from_str(json).map_err(|e| TrailIndexError::MetaTable {
        message: e.to_string(),
    })
}
