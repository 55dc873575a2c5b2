//! Catalog summary statistics for `GET /metrics`

use std::collections::HashMap;

use povlao_common::{CatalogEntry, UNKNOWN_ARTIST};
use serde::Serialize;

const TOP_ARTISTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistFrequency {
    pub artist: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistShare {
    pub artist: String,
    pub count: usize,
    /// Share of the catalog, e.g. `"12.50%"`
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMetrics {
    pub total_songs: usize,
    pub unique_artists: usize,
    pub most_frequent_artist: ArtistFrequency,
    pub missing_metadata: usize,
    pub top_artists: Vec<ArtistShare>,
}

fn artist_key(artist: &str) -> &str {
    let trimmed = artist.trim();
    if trimmed.is_empty() {
        UNKNOWN_ARTIST
    } else {
        trimmed
    }
}

fn is_missing_metadata(entry: &CatalogEntry) -> bool {
    entry.title.trim().is_empty() || artist_key(&entry.artist) == UNKNOWN_ARTIST
}

pub fn compute(songs: &[CatalogEntry]) -> LibraryMetrics {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for song in songs {
        *counts.entry(artist_key(&song.artist)).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let most_frequent_artist = ranked
        .first()
        .map(|(artist, count)| ArtistFrequency {
            artist: artist.to_string(),
            count: *count,
        })
        .unwrap_or_else(|| ArtistFrequency {
            artist: "Unknown".to_string(),
            count: 0,
        });

    let total = songs.len();
    let top_artists = ranked
        .iter()
        .take(TOP_ARTISTS)
        .map(|(artist, count)| ArtistShare {
            artist: artist.to_string(),
            count: *count,
            percentage: format!("{:.2}%", *count as f64 * 100.0 / total as f64),
        })
        .collect();

    LibraryMetrics {
        total_songs: total,
        unique_artists: ranked.len(),
        most_frequent_artist,
        missing_metadata: songs.iter().filter(|s| is_missing_metadata(s)).count(),
        top_artists,
    }
}
