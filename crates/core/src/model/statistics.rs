use chrono::TimeZone;
use thiserror::Error;

use crate::model::GameResult;
use crate::time::format_date_time;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error("total correct ({correct}) exceeds total asked ({asked})")]
    CorrectExceedsAsked { correct: u64, asked: u64 },
}

/// Running totals across every round ever played.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatisticsAggregate {
    games_played: u64,
    total_correct: u64,
    total_asked: u64,
    best_game: GameResult,
}

impl StatisticsAggregate {
    /// Rehydrate the aggregate from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::CorrectExceedsAsked` if the stored totals are
    /// inconsistent.
    pub fn from_persisted(
        games_played: u64,
        total_correct: u64,
        total_asked: u64,
        best_game: GameResult,
    ) -> Result<Self, StatisticsError> {
        if total_correct > total_asked {
            return Err(StatisticsError::CorrectExceedsAsked {
                correct: total_correct,
                asked: total_asked,
            });
        }
        Ok(Self {
            games_played,
            total_correct,
            total_asked,
            best_game,
        })
    }

    #[must_use]
    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    #[must_use]
    pub fn total_correct(&self) -> u64 {
        self.total_correct
    }

    #[must_use]
    pub fn total_asked(&self) -> u64 {
        self.total_asked
    }

    #[must_use]
    pub fn best_game(&self) -> &GameResult {
        &self.best_game
    }

    /// Percentage of correct answers over all rounds, `0.0` if nothing was asked.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        if self.total_asked == 0 {
            return 0.0;
        }
        100.0 * self.total_correct as f64 / self.total_asked as f64
    }

    /// Fold a finished round into the totals.
    ///
    /// Returns `true` when the round became the new best game.
    pub fn record(&mut self, result: &GameResult) -> bool {
        self.games_played = self.games_played.saturating_add(1);
        self.total_correct = self
            .total_correct
            .saturating_add(u64::from(result.correct()));
        self.total_asked = self.total_asked.saturating_add(u64::from(result.total()));

        if result.is_better_than(&self.best_game) {
            self.best_game = *result;
            true
        } else {
            false
        }
    }

    /// Human-readable block shown after a round, dates rendered in `tz`.
    #[must_use]
    pub fn summary_text<Tz>(&self, last_round: &GameResult, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let best = &self.best_game;
        format!(
            "Your result: {}/{}\nQuizzes played: {}\nRecord: {}/{} ({})\nAverage accuracy: {:.2}%",
            last_round.correct(),
            last_round.total(),
            self.games_played,
            best.correct(),
            best.total(),
            format_date_time(best.date(), tz),
            self.accuracy(),
        )
    }
}
