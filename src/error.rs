//! Unified error handling for the trail-indexer library.
//!
//! The indexing and remapping core is total over its inputs: malformed
//! geometry, missing segment tags and metadata lookup misses all degrade to
//! "excluded from canonical numbering" instead of raising. Errors exist only
//! at the edges: parsing trail data, loading the metadata table, fetching
//! over HTTP.

use std::fmt;

/// Unified error type for trail-indexer operations.
#[derive(Debug, Clone)]
pub enum TrailIndexError {
    /// Trail data could not be parsed as a GeoJSON feature collection
    Parse { message: String },
    /// The static segment metadata table could not be deserialized
    MetaTable { message: String },
    /// HTTP/fetch error
    Http {
        message: String,
        status_code: Option<u16>,
    },
    /// Configuration error
    Config { message: String },
    /// Generic internal error
    Internal { message: String },
}

impl fmt::Display for TrailIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailIndexError::Parse { message } => {
                write!(f, "Failed to parse trail data: {}", message)
            }
            TrailIndexError::MetaTable { message } => {
                write!(f, "Failed to load segment metadata table: {}", message)
            }
            TrailIndexError::Http {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "HTTP error ({}): {}", code, message)
                } else {
                    write!(f, "HTTP error: {}", message)
                }
            }
            TrailIndexError::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            TrailIndexError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TrailIndexError {}

/// Result type alias for trail-indexer operations.
pub type Result<T> = std::result::Result<T, TrailIndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrailIndexError::Parse {
            message: "unexpected token".to_string(),
        };
        assert!(err.to_string().contains("parse trail data"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_http_error_with_status() {
        let err = TrailIndexError::Http {
            message: "GET ./data/trail.geojson".to_string(),
            status_code: Some(404),
        };
        assert!(err.to_string().contains("404"));
    }
}
