//! Catalog search used by the server endpoints and the game's autocomplete

use std::collections::HashMap;

use crate::api::types::{ArtistCount, SongSummary};
use crate::models::CatalogEntry;
use crate::text::{contains_folded, fold};

/// Anything with a title and an artist can be searched
pub trait Searchable {
    fn title(&self) -> &str;
    fn artist(&self) -> &str;
}

impl Searchable for SongSummary {
    fn title(&self) -> &str {
        &self.title
    }

    fn artist(&self) -> &str {
        &self.artist
    }
}

impl Searchable for CatalogEntry {
    fn title(&self) -> &str {
        &self.title
    }

    fn artist(&self) -> &str {
        &self.artist
    }
}

/// Items whose title or artist contains `query`, ignoring case and accents
///
/// A blank query matches nothing.
pub fn matching<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let folded = fold(query.trim());
    if folded.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| {
            contains_folded(item.title(), &folded) || contains_folded(item.artist(), &folded)
        })
        .collect()
}

/// Artists whose name contains `query`, with their song counts
///
/// Spellings differing only in case are one artist, shown as first seen.
/// Sorted by count descending, then by name.
pub fn artist_counts<T: Searchable>(items: &[T], query: &str) -> Vec<ArtistCount> {
    let folded = fold(query.trim());
    let mut counts: HashMap<String, (&str, usize)> = HashMap::new();

    for item in items {
        let artist = item.artist();
        if contains_folded(artist, &folded) {
            counts.entry(artist.to_lowercase()).or_insert((artist, 0)).1 += 1;
        }
    }

    let mut artists: Vec<ArtistCount> = counts
        .into_values()
        .map(|(artist, count)| ArtistCount {
            artist: artist.to_string(),
            count,
        })
        .collect();
    artists.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.artist.cmp(&b.artist)));
    artists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(artist: &str, title: &str) -> SongSummary {
        SongSummary {
            title: title.to_string(),
            artist: artist.to_string(),
        }
    }

    fn catalog() -> Vec<SongSummary> {
        vec![
            song("Café Tacvba", "Eres"),
            song("Café Tacvba", "La Ingrata"),
            song("Soda Stereo", "De Música Ligera"),
            song("Caifanes", "Afuera"),
        ]
    }

    #[test]
    fn test_matching_title_or_artist_accent_insensitive() {
        let songs = catalog();

        let hits = matching(&songs, "musica");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].artist, "Soda Stereo");

        let hits = matching(&songs, "CAFE");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        assert!(matching(&catalog(), "   ").is_empty());
    }

    #[test]
    fn test_artist_counts_sorted_by_count() {
        let counts = artist_counts(&catalog(), "ca");
        assert_eq!(
            counts,
            vec![
                ArtistCount { artist: "Café Tacvba".to_string(), count: 2 },
                ArtistCount { artist: "Caifanes".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_artist_counts_merge_case_variants() {
        let songs = vec![
            song("Daft Punk", "X"),
            song("daft punk", "Y"),
            song("DAFT PUNK", "Z"),
        ];
        assert_eq!(
            artist_counts(&songs, "daft"),
            vec![ArtistCount { artist: "Daft Punk".to_string(), count: 3 }]
        );
    }

    #[test]
    fn test_artist_counts_empty_query_lists_everyone() {
        assert_eq!(artist_counts(&catalog(), "").len(), 3);
    }
}
