//! Round state machine
//!
//! A round starts at step 1 with no guesses. Every accepted guess that
//! neither wins nor uses up the last attempt advances one step. A winning
//! guess or the sixth guess reveals the round, which is terminal: the step is
//! forced to the last one and further guesses are ignored. A won round is
//! scored from the attempts used and the time since the round started.
//!
//! The only mutators are [`Round::submit_guess`], [`Round::skip`],
//! [`Round::toggle_play`], [`Round::on_time_update`], [`Round::seek`],
//! [`Round::begin_drag`], [`Round::set_volume`] and
//! [`Round::report_playback_error`]. Starting a new round means building a
//! new `Round`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use povlao_common::text::eq_ignore_case;
use povlao_common::Track;

use crate::playback::{
    self, boundary_reached, clamp_to_unlocked, PlaybackCommand, VolumeLevel, DEFAULT_VOLUME,
};
use crate::schedule::RevealSchedule;
use crate::scoring::calculate_score;

/// Attempts per round
pub const MAX_GUESSES: usize = 6;

/// Separator of free-text guesses ("Artist - Title")
const GUESS_SEPARATOR: &str = " - ";

/// What a skip costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Skipping records a wrong guess and uses up an attempt
    #[default]
    ConsumesGuess,
    /// Skipping only advances the step
    Free,
}

/// Guess as typed or picked by the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessInput {
    pub artist: String,
    pub title: String,
}

impl GuessInput {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Parse free text of the form `"Artist - Title"`
    ///
    /// Exactly one separator, both sides non-empty after trimming.
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<&str> = text.split(GUESS_SEPARATOR).collect();
        match parts.as_slice() {
            [artist, title] if !artist.trim().is_empty() && !title.trim().is_empty() => {
                Some(Self::new(artist.trim(), title.trim()))
            }
            _ => None,
        }
    }
}

/// Guess annotated at submission time; never changes afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guess {
    pub artist: String,
    pub title: String,
    pub is_correct_artist: bool,
    pub is_correct_title: bool,
    /// Recorded by a skip rather than typed
    pub skipped: bool,
}

impl Guess {
    fn judge(input: GuessInput, track: &Track) -> Self {
        Self {
            is_correct_artist: eq_ignore_case(&input.artist, &track.artist),
            is_correct_title: eq_ignore_case(&input.title, &track.title),
            artist: input.artist,
            title: input.title,
            skipped: false,
        }
    }

    fn skip() -> Self {
        Self {
            artist: "Skip".to_string(),
            title: "❌".to_string(),
            is_correct_artist: false,
            is_correct_title: false,
            skipped: true,
        }
    }

    pub fn is_win(&self) -> bool {
        self.is_correct_artist && self.is_correct_title
    }
}

/// Result of a guess or skip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Round already revealed or out of attempts; nothing changed
    Rejected,
    /// Wrong; the round moved on to `step`
    Advanced { step: usize },
    /// Correct artist and title; round revealed
    Won,
    /// Last attempt used without a win; round revealed
    Lost,
}

/// Where a round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    InProgress,
    Won,
    Lost,
}

/// Guessing state of a round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundState {
    pub step: usize,
    pub is_revealed: bool,
    pub guesses: Vec<Guess>,
    pub is_playing: bool,
}

impl RoundState {
    fn initial() -> Self {
        Self {
            step: 1,
            is_revealed: false,
            guesses: Vec::new(),
            is_playing: false,
        }
    }
}

#[derive(Debug, Clone)]
struct PlaybackState {
    position: f64,
    /// Stop point armed when playback started
    clip_end: f64,
    volume: f64,
    dragging: bool,
    error: Option<String>,
}

/// One guessing round for a single track
#[derive(Debug, Clone)]
pub struct Round {
    track: Track,
    schedule: RevealSchedule,
    skip_policy: SkipPolicy,
    state: RoundState,
    playback: PlaybackState,
    started_at: Instant,
    score: Option<u32>,
}

impl Round {
    pub fn new(track: Track, schedule: RevealSchedule, skip_policy: SkipPolicy) -> Self {
        let clip_end = schedule.unlocked_duration(1);
        Self {
            track,
            schedule,
            skip_policy,
            state: RoundState::initial(),
            playback: PlaybackState {
                position: 0.0,
                clip_end,
                volume: DEFAULT_VOLUME,
                dragging: false,
                error: None,
            },
            started_at: Instant::now(),
            score: None,
        }
    }

    /// Measure the score's elapsed time from `started_at`
    pub fn with_started_at(mut self, started_at: Instant) -> Self {
        self.started_at = started_at;
        self
    }

    /// Carry the player's volume over from the previous round
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.playback.volume = playback::clamp_volume(volume);
        self
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn schedule(&self) -> &RevealSchedule {
        &self.schedule
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        self.skip_policy
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Current step (forced to the last step once revealed)
    pub fn step(&self) -> usize {
        if self.state.is_revealed {
            self.schedule.len()
        } else {
            self.state.step
        }
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.state.guesses
    }

    pub fn is_revealed(&self) -> bool {
        self.state.is_revealed
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Score of a won round; `None` until won
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn outcome(&self) -> RoundOutcome {
        if self.state.guesses.iter().any(Guess::is_win) {
            RoundOutcome::Won
        } else if self.state.is_revealed {
            RoundOutcome::Lost
        } else {
            RoundOutcome::InProgress
        }
    }

    pub fn is_won(&self) -> bool {
        self.outcome() == RoundOutcome::Won
    }

    /// Whether new guesses are accepted
    pub fn accepts_guesses(&self) -> bool {
        !self.state.is_revealed && self.state.guesses.len() < MAX_GUESSES
    }

    /// Judge and record a guess
    pub fn submit_guess(&mut self, input: GuessInput) -> GuessResult {
        if !self.accepts_guesses() {
            return GuessResult::Rejected;
        }
        let guess = Guess::judge(input, &self.track);
        self.record(guess)
    }

    /// Whether the skip affordance is offered
    pub fn can_skip(&self) -> bool {
        self.accepts_guesses() && self.state.step < self.schedule.len()
    }

    /// Skip ahead according to the round's [`SkipPolicy`]
    pub fn skip(&mut self) -> GuessResult {
        if !self.can_skip() {
            return GuessResult::Rejected;
        }
        match self.skip_policy {
            SkipPolicy::ConsumesGuess => self.record(Guess::skip()),
            SkipPolicy::Free => {
                self.advance_step();
                GuessResult::Advanced {
                    step: self.state.step,
                }
            }
        }
    }

    fn record(&mut self, guess: Guess) -> GuessResult {
        let won = guess.is_win();
        debug!(
            artist = %guess.artist,
            title = %guess.title,
            correct_artist = guess.is_correct_artist,
            correct_title = guess.is_correct_title,
            "Guess recorded"
        );
        self.state.guesses.push(guess);

        if won {
            self.score = Some(calculate_score(
                self.state.guesses.len(),
                self.started_at.elapsed(),
            ));
            self.reveal();
            GuessResult::Won
        } else if self.state.guesses.len() >= MAX_GUESSES {
            self.reveal();
            GuessResult::Lost
        } else {
            self.advance_step();
            GuessResult::Advanced {
                step: self.state.step,
            }
        }
    }

    fn advance_step(&mut self) {
        self.state.step = (self.state.step + 1).min(self.schedule.len());
        self.state.is_playing = false;
    }

    fn reveal(&mut self) {
        self.state.is_revealed = true;
        self.state.step = self.schedule.len();
    }

    /// Seconds that may currently be heard and seeked into
    pub fn unlocked_duration(&self) -> f64 {
        self.schedule.unlocked_duration(self.step())
    }

    /// Cover blur for display (0 once revealed)
    pub fn blur_px(&self) -> u32 {
        if self.state.is_revealed {
            0
        } else {
            self.schedule.blur_px(self.step())
        }
    }

    pub fn position(&self) -> f64 {
        self.playback.position
    }

    /// Fraction of the seek bar drawn as played
    pub fn played_fraction(&self) -> f64 {
        playback::played_fraction(
            self.playback.position,
            self.unlocked_duration(),
            self.schedule.ceiling(),
        )
    }

    /// Play/pause button
    ///
    /// Starting from pause restarts the clip and arms the auto-pause at the
    /// unlocked duration.
    pub fn toggle_play(&mut self) -> PlaybackCommand {
        if self.state.is_playing {
            self.state.is_playing = false;
            return PlaybackCommand::Pause {
                at: self.playback.position,
            };
        }

        let until = self.unlocked_duration();
        self.playback.position = 0.0;
        self.playback.clip_end = until;
        self.playback.error = None;
        self.state.is_playing = true;
        PlaybackCommand::Play { from: 0.0, until }
    }

    /// Feed a time update from the audio element
    ///
    /// Returns a pause command exactly when the armed boundary is reached.
    pub fn on_time_update(&mut self, position: f64) -> Option<PlaybackCommand> {
        self.playback.position = position.max(0.0);
        if self.state.is_playing && boundary_reached(self.playback.position, self.playback.clip_end) {
            self.state.is_playing = false;
            return Some(PlaybackCommand::Pause {
                at: self.playback.position,
            });
        }
        None
    }

    /// Move the play head, clamped into the unlocked range
    ///
    /// Allowed whether or not playback is running.
    pub fn seek(&mut self, seconds: f64) -> f64 {
        let position = clamp_to_unlocked(seconds, self.unlocked_duration());
        self.playback.position = position;
        position
    }

    /// Start dragging the seek bar at pointer offset `x`
    ///
    /// The returned guard keeps updating the position as the pointer moves
    /// and ends the drag when dropped.
    pub fn begin_drag(&mut self, x: f64, bar_width: f64) -> SeekDrag<'_> {
        self.playback.dragging = true;
        let mut drag = SeekDrag {
            round: self,
            bar_width,
        };
        drag.move_to(x);
        drag
    }

    pub fn is_dragging(&self) -> bool {
        self.playback.dragging
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.playback.volume = playback::clamp_volume(volume);
        self.playback.volume
    }

    pub fn volume(&self) -> f64 {
        self.playback.volume
    }

    pub fn volume_level(&self) -> VolumeLevel {
        playback::volume_level(self.playback.volume)
    }

    /// Record a media error; playback stops until the round is replaced
    pub fn report_playback_error(&mut self, message: impl Into<String>) {
        self.playback.error = Some(message.into());
        self.state.is_playing = false;
    }

    pub fn playback_error(&self) -> Option<&str> {
        self.playback.error.as_deref()
    }
}

/// Active seek-bar drag
///
/// Holds the round mutably so nothing else can change it mid-drag. Dropping
/// the guard (release, early return or unwind) always ends the drag.
pub struct SeekDrag<'a> {
    round: &'a mut Round,
    bar_width: f64,
}

impl SeekDrag<'_> {
    /// Pointer moved to offset `x`; returns the new position
    pub fn move_to(&mut self, x: f64) -> f64 {
        let position = playback::pointer_to_position(
            x,
            self.bar_width,
            self.round.unlocked_duration(),
            self.round.schedule.ceiling(),
        );
        self.round.playback.position = position;
        position
    }

    /// Pointer released
    pub fn release(self) {}
}

impl Drop for SeekDrag<'_> {
    fn drop(&mut self) {
        self.round.playback.dragging = false;
    }
}
