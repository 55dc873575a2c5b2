//! Catalog query endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use povlao_common::api::types::{
    ArtistListResponse, RandomSongResponse, SongListResponse, SongRecord, SongSummary,
};
use povlao_common::search;

use crate::error::{ApiError, ApiResult};
use crate::pagination::Page;
use crate::selection::SelectionError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    pub artist: Option<String>,
}

/// Paging values arrive as raw strings so bad input falls back to defaults
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// GET /songs/random?artist=
pub async fn random_song(
    State(state): State<AppState>,
    Query(params): Query<RandomParams>,
) -> ApiResult<Json<RandomSongResponse>> {
    let artist = params
        .artist
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());

    let songs = state.catalog.snapshot().await;
    let song = state
        .selector
        .pick(&songs, artist)
        .await
        .map_err(|e: SelectionError| ApiError::NotFound(e.to_string()))?;

    Ok(Json(RandomSongResponse {
        song: song.record(),
    }))
}

/// GET /songs/list
pub async fn list_song_summaries(
    State(state): State<AppState>,
) -> Json<SongListResponse<SongSummary>> {
    let songs = state.catalog.snapshot().await;
    Json(SongListResponse {
        songs: songs.iter().map(|s| s.summary()).collect(),
    })
}

/// GET /songs?limit=&offset=
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<SongListResponse<SongRecord>> {
    let page = Page::from_query(params.limit.as_deref(), params.offset.as_deref());
    let songs = state.catalog.snapshot().await;
    Json(SongListResponse {
        songs: page.slice(songs.as_slice()).iter().map(|s| s.record()).collect(),
    })
}

/// GET /songs/search?q=
pub async fn search_songs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SongListResponse<SongSummary>> {
    let songs = state.catalog.snapshot().await;
    let query = params.q.unwrap_or_default();
    Json(SongListResponse {
        songs: search::matching(songs.as_slice(), &query)
            .into_iter()
            .map(|s| s.summary())
            .collect(),
    })
}

/// GET /artists?q=
pub async fn list_artists(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<ArtistListResponse> {
    let songs = state.catalog.snapshot().await;
    let query = params.q.unwrap_or_default();
    Json(ArtistListResponse {
        artists: search::artist_counts(songs.as_slice(), &query),
    })
}
