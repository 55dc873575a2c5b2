//! povlao-server library
//!
//! Song catalog ingestion and the HTTP API of Povlao Guess: random song
//! selection, catalog listing and search, metrics, feedback and the
//! leaderboard. Audio files are served from the songs directory.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog_cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pagination;
pub mod selection;
pub mod services;
pub mod stores;

use catalog_cache::CatalogCache;
use selection::SongSelector;
use stores::{FeedbackStore, LeaderboardStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogCache>,
    pub selector: Arc<SongSelector>,
    pub feedback: Arc<FeedbackStore>,
    pub leaderboard: Arc<LeaderboardStore>,
    /// Directory served under `/audio`
    pub songs_dir: PathBuf,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogCache>,
        recent_capacity: usize,
        feedback_path: PathBuf,
        leaderboard_path: PathBuf,
        songs_dir: PathBuf,
    ) -> Self {
        Self {
            catalog,
            selector: Arc::new(SongSelector::new(recent_capacity)),
            feedback: Arc::new(FeedbackStore::new(feedback_path)),
            leaderboard: Arc::new(LeaderboardStore::new(leaderboard_path)),
            songs_dir,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let audio = ServeDir::new(&state.songs_dir);

    Router::new()
        .route("/songs/random", get(api::random_song))
        .route("/songs/list", get(api::list_song_summaries))
        .route("/songs/search", get(api::search_songs))
        .route("/songs", get(api::list_songs))
        .route("/artists", get(api::list_artists))
        .route("/metrics", get(api::get_metrics))
        .route("/feedback", post(api::submit_feedback))
        .route(
            "/leaderboard",
            get(api::get_leaderboard).post(api::submit_score),
        )
        .merge(api::health_routes())
        .nest_service("/audio", audio)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
