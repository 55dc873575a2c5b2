//! `"Artist - Title.ext"` file name convention

use std::path::Path;

use povlao_common::UNKNOWN_ARTIST;

const SEPARATOR: &str = " - ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub artist: String,
    pub title: String,
}

/// Split a file name into artist and title
///
/// The extension is dropped and the stem split at the first `" - "`. Without
/// a separator, or with a blank artist part, the artist is
/// [`UNKNOWN_ARTIST`] and the title is what remains.
pub fn parse_song_filename(file_name: &str) -> ParsedName {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let (artist, title) = match stem.split_once(SEPARATOR) {
        Some((artist, title)) => (artist.trim(), title.trim()),
        None => ("", stem.trim()),
    };

    ParsedName {
        artist: if artist.is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            artist.to_string()
        },
        title: title.to_string(),
    }
}
