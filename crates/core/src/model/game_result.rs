use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::distant_past;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("correct answers ({correct}) exceed questions asked ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Outcome of one finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl GameResult {
    /// Build a result for a round finished at `date`.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::CorrectExceedsTotal` if `correct > total`.
    pub fn new(correct: u32, total: u32, date: DateTime<Utc>) -> Result<Self, GameResultError> {
        if correct > total {
            return Err(GameResultError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            correct,
            total,
            date,
        })
    }

    /// The "never played" best game: `0/0` dated in the distant past.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            correct: 0,
            total: 0,
            date: distant_past(),
        }
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// True when every question of the round was answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }

    /// Strictly more correct answers than `other`.
    ///
    /// Only the raw count is compared, so 8/10 beats 3/3.
    #[must_use]
    pub fn is_better_than(&self, other: &GameResult) -> bool {
        self.correct > other.correct
    }
}

impl Default for GameResult {
    fn default() -> Self {
        Self::sentinel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn rejects_more_correct_than_total() {
        let err = GameResult::new(4, 3, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            GameResultError::CorrectExceedsTotal {
                correct: 4,
                total: 3
            }
        );
    }

    #[test]
    fn compares_raw_correct_count_not_ratio() {
        let perfect_short = GameResult::new(3, 3, fixed_now()).unwrap();
        let long = GameResult::new(8, 10, fixed_now()).unwrap();
        assert!(long.is_better_than(&perfect_short));
        assert!(!perfect_short.is_better_than(&long));
    }

    #[test]
    fn equal_counts_are_not_better() {
        let a = GameResult::new(7, 10, fixed_now()).unwrap();
        let b = GameResult::new(7, 10, fixed_now()).unwrap();
        assert!(!a.is_better_than(&b));
    }

    #[test]
    fn sentinel_is_empty_and_not_perfect() {
        let sentinel = GameResult::sentinel();
        assert_eq!(sentinel.correct(), 0);
        assert_eq!(sentinel.total(), 0);
        assert!(sentinel.date() < fixed_now());
        assert!(!sentinel.is_perfect());
        assert_eq!(GameResult::default(), sentinel);
    }
}
