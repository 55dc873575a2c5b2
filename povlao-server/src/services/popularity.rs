//! Track popularity enrichment (Spotify Web API)
//!
//! Client-credentials flow: one access token per ingestion run, then one
//! track search per file. Every request is bounded by the client timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;

const SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const USER_AGENT: &str = concat!("povlao-server/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum PopularityError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("API error {0}")]
    ApiError(u16),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No access token; call prepare() first")]
    NotPrepared,
}

/// Spotify application credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Source of a 0-100 popularity score for a track
#[async_trait]
pub trait PopularitySource: Send + Sync {
    /// Called once at the start of every ingestion run
    async fn prepare(&self) -> Result<(), PopularityError> {
        Ok(())
    }

    /// Popularity of the best match, `None` when nothing matches
    async fn lookup(&self, artist: &str, title: &str) -> Result<Option<i64>, PopularityError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    popularity: Option<i64>,
}

/// Popularity of the first search hit
fn popularity_from_search(body: &str) -> Result<Option<i64>, PopularityError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| PopularityError::ParseError(e.to_string()))?;
    Ok(response
        .tracks
        .and_then(|page| page.items.into_iter().next())
        .and_then(|item| item.popularity))
}

pub struct SpotifyPopularity {
    http: reqwest::Client,
    credentials: SpotifyCredentials,
    token_url: String,
    api_url: String,
    token: RwLock<Option<String>>,
}

impl SpotifyPopularity {
    pub fn new(credentials: SpotifyCredentials, timeout: Duration) -> Result<Self, PopularityError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PopularityError::NetworkError(e.to_string()))?;

        Ok(Self {
            http,
            credentials,
            token_url: SPOTIFY_ACCOUNTS_URL.to_string(),
            api_url: SPOTIFY_API_URL.to_string(),
            token: RwLock::new(None),
        })
    }

    /// Point the client at other token and API endpoints (local test servers)
    pub fn with_endpoints(mut self, token_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl PopularitySource for SpotifyPopularity {
    async fn prepare(&self) -> Result<(), PopularityError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PopularityError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            *self.token.write().await = None;
            return Err(PopularityError::AuthError(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PopularityError::ParseError(e.to_string()))?;
        *self.token.write().await = Some(token.access_token);
        tracing::debug!("Spotify access token acquired");
        Ok(())
    }

    async fn lookup(&self, artist: &str, title: &str) -> Result<Option<i64>, PopularityError> {
        let token = self
            .token
            .read()
            .await
            .clone()
            .ok_or(PopularityError::NotPrepared)?;

        let query = format!("{artist} {title}");
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PopularityError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PopularityError::ApiError(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PopularityError::NetworkError(e.to_string()))?;
        popularity_from_search(&body)
    }
}
