//! Game session: rounds in sequence
//!
//! Owns the current [`Round`], the streak and the artist filter. Tracks come
//! from a [`TrackSource`]; streaks go to a [`ScoreReporter`]. Streak rules:
//! a win adds one, a loss resets to zero, abandoning an unwon round resets to
//! zero, and changing the artist filter resets to zero. Recovering from a
//! playback failure replaces the track without touching the streak.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use povlao_common::Track;

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::round::{GuessInput, GuessResult, Round, SkipPolicy};
use crate::schedule::RevealSchedule;

/// Supplies the next track to guess
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// Random track, optionally restricted to one artist
    async fn random_track(&self, artist: Option<&str>) -> GameResult<Track>;
}

/// Receives the current streak whenever it grows
#[async_trait]
pub trait ScoreReporter: Send + Sync {
    async fn report_streak(&self, username: &str, streak: u32) -> GameResult<()>;
}

/// Reporter that drops every score (offline play)
pub struct NoopReporter;

#[async_trait]
impl ScoreReporter for NoopReporter {
    async fn report_streak(&self, _username: &str, _streak: u32) -> GameResult<()> {
        Ok(())
    }
}

/// Sequence of rounds for one player
pub struct GameSession {
    source: Arc<dyn TrackSource>,
    reporter: Arc<dyn ScoreReporter>,
    username: String,
    schedule: RevealSchedule,
    skip_policy: SkipPolicy,
    artist_filter: Option<String>,
    round: Round,
    streak: u32,
}

impl GameSession {
    /// Fetch the first track and start round one
    pub async fn start(
        source: Arc<dyn TrackSource>,
        reporter: Arc<dyn ScoreReporter>,
        config: &GameConfig,
    ) -> GameResult<Self> {
        let schedule = config.schedule()?;
        let track = source.random_track(None).await?;
        info!(artist = %track.artist, "Game session started");

        Ok(Self {
            round: Round::new(track, schedule.clone(), config.skip_policy),
            source,
            reporter,
            username: config.username.clone(),
            schedule,
            skip_policy: config.skip_policy,
            artist_filter: None,
            streak: 0,
        })
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Playback controls (seek, volume, time updates) go through here
    pub fn round_mut(&mut self) -> &mut Round {
        &mut self.round
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn artist_filter(&self) -> Option<&str> {
        self.artist_filter.as_deref()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Submit a guess for the current round and update the streak
    pub async fn submit_guess(&mut self, input: GuessInput) -> GuessResult {
        let result = self.round.submit_guess(input);
        self.apply_result(result).await;
        result
    }

    /// Skip ahead in the current round
    pub async fn skip(&mut self) -> GuessResult {
        let result = self.round.skip();
        self.apply_result(result).await;
        result
    }

    async fn apply_result(&mut self, result: GuessResult) {
        match result {
            GuessResult::Won => {
                self.streak += 1;
                info!(streak = self.streak, score = ?self.round.score(), "Round won");
                self.report_streak().await;
            }
            GuessResult::Lost => {
                info!(previous_streak = self.streak, "Round lost");
                self.streak = 0;
            }
            GuessResult::Advanced { .. } | GuessResult::Rejected => {}
        }
    }

    async fn report_streak(&self) {
        if self.streak == 0 {
            return;
        }
        if let Err(e) = self.reporter.report_streak(&self.username, self.streak).await {
            warn!(error = %e, streak = self.streak, "Failed to report streak");
        }
    }

    /// Start a new round with a fresh track
    ///
    /// Abandoning a round that was not won resets the streak. When no track
    /// can be fetched the current round stays in place.
    pub async fn reset_round(&mut self) -> GameResult<()> {
        let track = self.source.random_track(self.artist_filter.as_deref()).await?;
        if !self.round.is_won() {
            self.streak = 0;
        }
        self.replace_round(track);
        Ok(())
    }

    /// Restrict future rounds to one artist (or lift the restriction)
    ///
    /// Always resets the streak and starts a new round.
    pub async fn set_artist_filter(&mut self, artist: Option<String>) -> GameResult<()> {
        let artist = artist.filter(|a| !a.trim().is_empty());
        let track = self.source.random_track(artist.as_deref()).await?;
        info!(artist_filter = ?artist, "Artist filter changed");
        self.artist_filter = artist;
        self.streak = 0;
        self.replace_round(track);
        Ok(())
    }

    /// Discard a track that failed to play and start over with another
    ///
    /// Not a loss: the streak is kept.
    pub async fn recover_from_playback_failure(&mut self) -> GameResult<()> {
        if let Some(error) = self.round.playback_error() {
            warn!(error = %error, file = %self.round.track().audio_ref, "Replacing unplayable track");
        }
        let track = self.source.random_track(self.artist_filter.as_deref()).await?;
        self.replace_round(track);
        Ok(())
    }

    fn replace_round(&mut self, track: Track) {
        let volume = self.round.volume();
        self.round = Round::new(track, self.schedule.clone(), self.skip_policy).with_volume(volume);
    }
}
