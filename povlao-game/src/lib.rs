//! # Povlao Guess game engine
//!
//! Drives one guessing round at a time: which part of a clip is audible,
//! how blurred the cover is, how guesses are scored and when the round ends.
//!
//! - [`schedule`]: reveal steps (audible seconds + blur per step)
//! - [`playback`]: pure playback-boundary and seek-bar functions
//! - [`round`]: the round state machine
//! - [`scoring`]: points for a won round (attempts used and time taken)
//! - [`session`]: rounds in sequence, streak, artist filter, recovery
//! - [`client`]: HTTP track source and score reporter for the catalog server

pub mod client;
pub mod config;
pub mod error;
pub mod playback;
pub mod round;
pub mod schedule;
pub mod scoring;
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use round::{Guess, GuessInput, GuessResult, Round, RoundOutcome, SeekDrag, SkipPolicy, MAX_GUESSES};
pub use schedule::{RevealSchedule, RevealStep};
pub use session::{GameSession, ScoreReporter, TrackSource};
