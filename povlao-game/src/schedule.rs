//! Reveal schedule
//!
//! A round walks through a fixed number of steps. Each step unlocks a longer
//! stretch of audio and a sharper cover. Steps are 1-based throughout.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Audible seconds per step of the standard schedule
pub const DEFAULT_DURATIONS_SECS: [f64; 6] = [2.0, 4.0, 7.0, 11.0, 16.0, 22.0];

/// Cover blur (pixels) per step of the standard schedule
pub const DEFAULT_BLUR_PX: [u32; 6] = [100, 98, 83, 52, 22, 0];

/// One reveal step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealStep {
    /// Seconds from the start of the clip that may be heard
    pub duration_secs: f64,
    /// Cover blur radius in pixels
    pub blur_px: u32,
}

/// Ordered, validated reveal steps
///
/// Durations strictly increase, blur strictly decreases, and the last step
/// is fully sharp. The last step's duration is the whole playable clip.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSchedule {
    steps: Vec<RevealStep>,
}

impl RevealSchedule {
    pub fn new(steps: Vec<RevealStep>) -> GameResult<Self> {
        let Some(last) = steps.last() else {
            return Err(GameError::InvalidSchedule("no steps".to_string()));
        };

        if last.blur_px != 0 {
            return Err(GameError::InvalidSchedule(format!(
                "final step must have zero blur, got {}px",
                last.blur_px
            )));
        }

        if steps
            .iter()
            .any(|s| !s.duration_secs.is_finite() || s.duration_secs <= 0.0)
        {
            return Err(GameError::InvalidSchedule(
                "durations must be positive".to_string(),
            ));
        }

        for (index, pair) in steps.windows(2).enumerate() {
            if pair[1].duration_secs <= pair[0].duration_secs {
                return Err(GameError::InvalidSchedule(format!(
                    "duration of step {} does not exceed step {}",
                    index + 2,
                    index + 1
                )));
            }
            if pair[1].blur_px >= pair[0].blur_px {
                return Err(GameError::InvalidSchedule(format!(
                    "blur of step {} is not below step {}",
                    index + 2,
                    index + 1
                )));
            }
        }

        Ok(Self { steps })
    }

    /// Number of steps (N)
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated schedule
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[RevealStep] {
        &self.steps
    }

    /// Step `step` (1-based), clamped into `1..=N`
    pub fn step(&self, step: usize) -> &RevealStep {
        let index = step.clamp(1, self.steps.len()) - 1;
        &self.steps[index]
    }

    /// Seconds unlocked at `step`
    pub fn unlocked_duration(&self, step: usize) -> f64 {
        self.step(step).duration_secs
    }

    /// Blur at `step`
    pub fn blur_px(&self, step: usize) -> u32 {
        self.step(step).blur_px
    }

    /// Length of the whole playable clip (final step duration)
    pub fn ceiling(&self) -> f64 {
        self.steps[self.steps.len() - 1].duration_secs
    }

    /// Position of each step boundary as a fraction of the clip ceiling
    pub fn marker_fractions(&self) -> Vec<f64> {
        let ceiling = self.ceiling();
        self.steps
            .iter()
            .map(|s| s.duration_secs / ceiling)
            .collect()
    }
}

impl Default for RevealSchedule {
    fn default() -> Self {
        let steps = DEFAULT_DURATIONS_SECS
            .iter()
            .zip(DEFAULT_BLUR_PX)
            .map(|(&duration_secs, blur_px)| RevealStep {
                duration_secs,
                blur_px,
            })
            .collect();
        Self { steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(duration_secs: f64, blur_px: u32) -> RevealStep {
        RevealStep {
            duration_secs,
            blur_px,
        }
    }

    #[test]
    fn test_default_schedule_is_valid() {
        let schedule = RevealSchedule::default();
        assert_eq!(RevealSchedule::new(schedule.steps().to_vec()).unwrap(), schedule);
        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule.ceiling(), 22.0);
    }

    #[test]
    fn test_step_lookup_is_clamped() {
        let schedule = RevealSchedule::default();
        assert_eq!(schedule.unlocked_duration(0), 2.0);
        assert_eq!(schedule.unlocked_duration(1), 2.0);
        assert_eq!(schedule.unlocked_duration(4), 11.0);
        assert_eq!(schedule.unlocked_duration(99), 22.0);
        assert_eq!(schedule.blur_px(1), 100);
        assert_eq!(schedule.blur_px(6), 0);
    }

    #[test]
    fn test_rejects_non_increasing_durations() {
        let err = RevealSchedule::new(vec![step(2.0, 10), step(2.0, 0)]).unwrap_err();
        assert!(matches!(err, GameError::InvalidSchedule(_)));
    }

    #[test]
    fn test_rejects_non_decreasing_blur() {
        let err = RevealSchedule::new(vec![step(2.0, 10), step(4.0, 10), step(6.0, 0)]).unwrap_err();
        assert!(matches!(err, GameError::InvalidSchedule(_)));
    }

    #[test]
    fn test_rejects_blurred_final_step_and_empty() {
        assert!(RevealSchedule::new(vec![step(2.0, 5)]).is_err());
        assert!(RevealSchedule::new(Vec::new()).is_err());
    }

    #[test]
    fn test_marker_fractions_end_at_one() {
        let markers = RevealSchedule::default().marker_fractions();
        assert_eq!(markers.len(), 6);
        assert_eq!(markers[5], 1.0);
        assert!(markers.windows(2).all(|w| w[0] < w[1]));
    }
}
