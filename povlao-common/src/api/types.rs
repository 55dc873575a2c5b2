//! Request and response bodies for the catalog/game HTTP API
//!
//! Field names follow the JSON the browser client has always consumed
//! (`coverUrl`, `{ song }`, `{ songs }`), so serde renames are explicit.

use serde::{Deserialize, Serialize};

/// Title and artist only (`GET /songs/list`, `GET /songs/search`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub title: String,
    pub artist: String,
}

/// Full song record (`GET /songs/random`, `GET /songs`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub file: String,
    #[serde(rename = "coverUrl")]
    pub cover_url: Option<String>,
}

/// Response for `GET /songs/random`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomSongResponse {
    pub song: SongRecord,
}

/// Response for the song listing endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongListResponse<T> {
    pub songs: Vec<T>,
}

/// Artist with the number of catalog songs credited to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCount {
    pub artist: String,
    pub count: usize,
}

/// Response for `GET /artists`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistListResponse {
    pub artists: Vec<ArtistCount>,
}

/// Body of `POST /leaderboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub username: String,
    pub score: serde_json::Number,
}

/// One row of `GET /leaderboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: serde_json::Number,
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub category: String,
    pub message: String,
}

/// Generic `{ "success": true }` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error body returned with every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
