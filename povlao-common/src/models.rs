//! Catalog and track records
//!
//! Every persisted or transmitted entity gets an explicit record type; rows
//! and payloads are converted at the boundary instead of being accessed by
//! field name at runtime.

use serde::{Deserialize, Serialize};

use crate::api::types::{SongRecord, SongSummary};

/// Artist name used when a file name carries no artist part
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// One playable track as handed to a guessing round
///
/// Immutable once a round has been started with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Locator the player loads audio from (usually a URL)
    pub audio_ref: String,
    /// Cover art locator (data URI or URL), if any
    pub cover_ref: Option<String>,
}

/// Persisted catalog row, keyed by `file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: String,
    pub artist: String,
    /// File name relative to the songs directory (natural key)
    pub file: String,
    /// Cover art as a data URI or external URL
    pub cover_url: Option<String>,
    /// File modification time in milliseconds since the Unix epoch
    pub modified: i64,
    /// Popularity score (0-100) from metadata enrichment
    pub popularity: Option<i64>,
}

impl CatalogEntry {
    /// Light projection used for search and autocomplete
    pub fn summary(&self) -> SongSummary {
        SongSummary {
            title: self.title.clone(),
            artist: self.artist.clone(),
        }
    }

    /// Full projection returned by the random and paginated endpoints
    pub fn record(&self) -> SongRecord {
        SongRecord {
            title: self.title.clone(),
            artist: self.artist.clone(),
            file: self.file.clone(),
            cover_url: self.cover_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> CatalogEntry {
        CatalogEntry {
            title: "One More Time".to_string(),
            artist: "Daft Punk".to_string(),
            file: "Daft Punk - One More Time.mp3".to_string(),
            cover_url: Some("data:image/png;base64,AAAA".to_string()),
            modified: 1_700_000_000_000,
            popularity: Some(80),
        }
    }

    #[test]
    fn test_summary_drops_file_and_cover() {
        let summary = entry().summary();
        assert_eq!(summary.title, "One More Time");
        assert_eq!(summary.artist, "Daft Punk");
    }

    #[test]
    fn test_record_serializes_cover_url_in_camel_case() {
        let json = serde_json::to_value(entry().record()).unwrap();
        assert_eq!(json["file"], "Daft Punk - One More Time.mp3");
        assert_eq!(json["coverUrl"], "data:image/png;base64,AAAA");
        assert!(json.get("modified").is_none());
    }
}
