//! HTTP API handlers for povlao-server

pub mod feedback;
pub mod health;
pub mod leaderboard;
pub mod metrics;
pub mod songs;

pub use feedback::submit_feedback;
pub use health::health_routes;
pub use leaderboard::{get_leaderboard, submit_score};
pub use metrics::get_metrics;
pub use songs::{list_artists, list_song_summaries, list_songs, random_song, search_songs};
