//! Game engine errors

use thiserror::Error;

/// Result type for engine operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors surfaced by the game engine
#[derive(Debug, Error)]
pub enum GameError {
    /// Reveal schedule violates its ordering invariants
    #[error("Invalid reveal schedule: {0}")]
    InvalidSchedule(String),

    /// The catalog has no song for the requested filter
    #[error("No songs available: {0}")]
    NoSongs(String),

    /// Track source could not deliver a track (network, decoding, ...)
    #[error("Track source error: {0}")]
    TrackSource(String),

    /// Score could not be reported
    #[error("Score report failed: {0}")]
    ScoreReport(String),

    /// Client configuration is unusable (bad base URL, ...)
    #[error("Configuration error: {0}")]
    Config(String),
}
