//! HTTP client for the catalog server
//!
//! Implements [`TrackSource`] over `GET /songs/random` and [`ScoreReporter`]
//! over `POST /leaderboard`, and serves autocomplete suggestions from a
//! cached copy of `GET /songs/list`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tokio::sync::OnceCell;
use tracing::debug;

use povlao_common::api::types::{
    ArtistCount, ErrorResponse, RandomSongResponse, ScoreSubmission, SongListResponse, SongRecord,
    SongSummary,
};
use povlao_common::search;
use povlao_common::Track;

use crate::error::{GameError, GameResult};
use crate::session::{ScoreReporter, TrackSource};

const USER_AGENT: &str = concat!("povlao-game/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Guess suggestions shown at once
pub const MAX_GUESS_SUGGESTIONS: usize = 6;

fn build_http_client() -> GameResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GameError::Config(e.to_string()))
}

fn parse_base_url(base_url: &str) -> GameResult<Url> {
    let url = Url::parse(base_url).map_err(|e| GameError::Config(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(GameError::Config(format!("{base_url}: not a base URL")));
    }
    Ok(url)
}

/// `base` with `segments` appended as percent-encoded path segments
fn endpoint(base: &Url, segments: &[&str]) -> GameResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GameError::Config(format!("{base}: not a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Catalog server client
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
    song_list: OnceCell<Vec<SongSummary>>,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> GameResult<Self> {
        Ok(Self {
            http: build_http_client()?,
            base_url: parse_base_url(base_url)?,
            song_list: OnceCell::new(),
        })
    }

    /// Where the audio of `file` is served
    pub fn audio_url(&self, file: &str) -> GameResult<Url> {
        endpoint(&self.base_url, &["audio", file])
    }

    /// `GET /songs/random`
    pub async fn fetch_random(&self, artist: Option<&str>) -> GameResult<SongRecord> {
        let mut url = endpoint(&self.base_url, &["songs", "random"])?;
        if let Some(artist) = artist {
            url.query_pairs_mut().append_pair("artist", artist);
        }
        debug!(url = %url, "Fetching random song");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GameError::TrackSource(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "no songs".to_string());
            return Err(GameError::NoSongs(message));
        }
        if !status.is_success() {
            return Err(GameError::TrackSource(format!("server returned {status}")));
        }

        let body: RandomSongResponse = response
            .json()
            .await
            .map_err(|e| GameError::TrackSource(e.to_string()))?;
        Ok(body.song)
    }

    /// `GET /songs/list`, fetched once and cached
    pub async fn song_list(&self) -> GameResult<&[SongSummary]> {
        let songs = self
            .song_list
            .get_or_try_init(|| async {
                let url = endpoint(&self.base_url, &["songs", "list"])?;
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| GameError::TrackSource(e.to_string()))?;
                let body: SongListResponse<SongSummary> = response
                    .json()
                    .await
                    .map_err(|e| GameError::TrackSource(e.to_string()))?;
                debug!(count = body.songs.len(), "Song list cached");
                Ok::<_, GameError>(body.songs)
            })
            .await?;
        Ok(songs)
    }

    /// Songs matching a partially typed guess
    pub async fn guess_suggestions(&self, query: &str) -> GameResult<Vec<SongSummary>> {
        let songs = self.song_list().await?;
        Ok(search::matching(songs, query)
            .into_iter()
            .take(MAX_GUESS_SUGGESTIONS)
            .cloned()
            .collect())
    }

    /// Artists matching a partially typed filter, with song counts
    pub async fn artist_suggestions(&self, query: &str) -> GameResult<Vec<ArtistCount>> {
        let songs = self.song_list().await?;
        Ok(search::artist_counts(songs, query))
    }
}

#[async_trait]
impl TrackSource for HttpCatalogClient {
    async fn random_track(&self, artist: Option<&str>) -> GameResult<Track> {
        let song = self.fetch_random(artist).await?;
        let audio_ref = self.audio_url(&song.file)?.to_string();
        Ok(Track {
            title: song.title.trim().to_string(),
            artist: song.artist.trim().to_string(),
            audio_ref,
            cover_ref: song.cover_url,
        })
    }
}

/// Posts streaks to the leaderboard
pub struct HttpScoreReporter {
    http: reqwest::Client,
    url: Url,
}

impl HttpScoreReporter {
    pub fn new(base_url: &str) -> GameResult<Self> {
        let base = parse_base_url(base_url)?;
        Ok(Self {
            http: build_http_client()?,
            url: endpoint(&base, &["leaderboard"])?,
        })
    }
}

#[async_trait]
impl ScoreReporter for HttpScoreReporter {
    async fn report_streak(&self, username: &str, streak: u32) -> GameResult<()> {
        let body = ScoreSubmission {
            username: username.to_string(),
            score: serde_json::Number::from(streak),
        };
        self.http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GameError::ScoreReport(e.to_string()))?;
        Ok(())
    }
}
