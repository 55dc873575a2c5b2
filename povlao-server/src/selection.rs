//! Random song selection with recent-repeat avoidance
//!
//! The last `capacity` picks are remembered in a ring. A pick avoids them
//! when any other candidate exists, and falls back to the full candidate set
//! otherwise. The same rule applies with and without an artist filter.

use std::collections::VecDeque;

use povlao_common::text::eq_ignore_case;
use povlao_common::CatalogEntry;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No songs available")]
    EmptyCatalog,

    #[error("No songs found for artist: {0}")]
    NoSongsForArtist(String),
}

/// Bounded FIFO of recently served files
#[derive(Debug)]
pub struct RecentlyPlayed {
    capacity: usize,
    files: VecDeque<String>,
}

impl RecentlyPlayed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            files: VecDeque::with_capacity(capacity),
        }
    }

    pub fn contains(&self, file: &str) -> bool {
        self.files.iter().any(|f| f == file)
    }

    pub fn record(&mut self, file: &str) {
        if self.capacity == 0 {
            return;
        }
        self.files.retain(|f| f != file);
        if self.files.len() == self.capacity {
            self.files.pop_front();
        }
        self.files.push_back(file.to_string());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Pick one candidate, preferring ones not played recently
pub fn choose<'a, R: Rng + ?Sized>(
    songs: &'a [CatalogEntry],
    artist: Option<&str>,
    recent: &RecentlyPlayed,
    rng: &mut R,
) -> Result<&'a CatalogEntry, SelectionError> {
    if songs.is_empty() {
        return Err(SelectionError::EmptyCatalog);
    }

    let candidates: Vec<&CatalogEntry> = match artist {
        Some(artist) => {
            let filtered: Vec<&CatalogEntry> = songs
                .iter()
                .filter(|song| eq_ignore_case(&song.artist, artist))
                .collect();
            if filtered.is_empty() {
                return Err(SelectionError::NoSongsForArtist(artist.to_string()));
            }
            filtered
        }
        None => songs.iter().collect(),
    };

    let fresh: Vec<&CatalogEntry> = candidates
        .iter()
        .copied()
        .filter(|song| !recent.contains(&song.file))
        .collect();
    let pool = if fresh.is_empty() { &candidates } else { &fresh };

    pool.choose(rng)
        .copied()
        .ok_or(SelectionError::EmptyCatalog)
}

/// Thread-safe selector shared by request handlers
#[derive(Debug)]
pub struct SongSelector {
    recent: Mutex<RecentlyPlayed>,
}

impl SongSelector {
    pub fn new(recent_capacity: usize) -> Self {
        Self {
            recent: Mutex::new(RecentlyPlayed::new(recent_capacity)),
        }
    }

    /// Pick a random song and remember it
    pub async fn pick(
        &self,
        songs: &[CatalogEntry],
        artist: Option<&str>,
    ) -> Result<CatalogEntry, SelectionError> {
        let mut recent = self.recent.lock().await;
        let song = {
            let mut rng = rand::thread_rng();
            choose(songs, artist, &recent, &mut rng)?.clone()
        };
        recent.record(&song.file);
        debug!(file = %song.file, remembered = recent.len(), "Song selected");
        Ok(song)
    }
}
