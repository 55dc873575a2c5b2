//! Playback boundary and seek-bar math
//!
//! Everything here is a pure function of (time, unlocked duration, clip
//! ceiling); the round owns the state and calls into these.

/// What the host audio element should do next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackCommand {
    /// Start playing at `from` and stop at `until`
    Play { from: f64, until: f64 },
    /// Pause; `at` is the position reached
    Pause { at: f64 },
}

/// Coarse volume bucket for the volume icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    Medium,
}

/// Default volume of a fresh round
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Clamp a requested position into `[0, unlocked]`
pub fn clamp_to_unlocked(seconds: f64, unlocked: f64) -> f64 {
    if seconds.is_nan() {
        return 0.0;
    }
    seconds.clamp(0.0, unlocked.max(0.0))
}

/// True once playback has reached the armed stop point
pub fn boundary_reached(position: f64, clip_end: f64) -> bool {
    position >= clip_end
}

/// Map a pointer offset on the seek bar to a clip position
///
/// The bar spans the whole clip ceiling; the result is clamped into the
/// unlocked range. A zero-width bar maps everything to 0.
pub fn pointer_to_position(x: f64, bar_width: f64, unlocked: f64, ceiling: f64) -> f64 {
    if bar_width <= 0.0 || x.is_nan() {
        return 0.0;
    }
    let x = x.clamp(0.0, bar_width);
    clamp_to_unlocked(x * ceiling / bar_width, unlocked)
}

/// Fraction of the bar drawn as played
pub fn played_fraction(position: f64, unlocked: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return 0.0;
    }
    clamp_to_unlocked(position, unlocked) / ceiling
}

/// Clamp volume into `[0, 1]`
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return DEFAULT_VOLUME;
    }
    volume.clamp(0.0, 1.0)
}

pub fn volume_level(volume: f64) -> VolumeLevel {
    if volume <= 0.0 {
        VolumeLevel::Muted
    } else if volume < 0.5 {
        VolumeLevel::Low
    } else {
        VolumeLevel::Medium
    }
}

/// `m:ss` clock text
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
