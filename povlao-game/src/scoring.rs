//! Round score

use std::time::Duration;

const BASE_SCORE: u32 = 100;
const GUESS_PENALTY: u32 = 10;

/// `100 - 10 per guess - 1 per whole second`, floored at 0
pub fn calculate_score(guesses_used: usize, time_taken: Duration) -> u32 {
    let guess_penalty = (guesses_used as u64).saturating_mul(GUESS_PENALTY as u64);
    let time_penalty = time_taken.as_secs();
    (BASE_SCORE as u64)
        .saturating_sub(guess_penalty)
        .saturating_sub(time_penalty) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_score() {
        assert_eq!(calculate_score(1, Duration::from_millis(12_900)), 78);
        assert_eq!(calculate_score(6, Duration::from_secs(39)), 1);
        assert_eq!(calculate_score(6, Duration::from_secs(300)), 0);
        assert_eq!(calculate_score(0, Duration::ZERO), 100);
    }
}
