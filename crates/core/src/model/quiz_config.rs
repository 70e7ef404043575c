use std::time::Duration;

use thiserror::Error;

/// Questions per round when nothing else is configured.
pub const DEFAULT_TOTAL_QUESTIONS: u32 = 10;

/// How long correctness feedback stays visible before advancing.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_secs(1);

const MAX_REVEAL_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizConfigError {
    #[error("a round needs at least one question")]
    NoQuestions,

    #[error("reveal delay must be at most {max_ms} ms")]
    RevealDelayTooLong { max_ms: u128 },
}

/// Validated settings for a quiz round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizConfig {
    total_questions: u32,
    reveal_delay: Duration,
}

/// Unvalidated input, e.g. parsed from env vars or flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizConfigDraft {
    pub total_questions: Option<u32>,
    pub reveal_delay: Option<Duration>,
}

impl QuizConfigDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns `QuizConfigError` if the round would have no questions or the
    /// reveal delay is unreasonably long.
    pub fn validate(self) -> Result<QuizConfig, QuizConfigError> {
        let total_questions = self.total_questions.unwrap_or(DEFAULT_TOTAL_QUESTIONS);
        if total_questions == 0 {
            return Err(QuizConfigError::NoQuestions);
        }

        let reveal_delay = self.reveal_delay.unwrap_or(DEFAULT_REVEAL_DELAY);
        if reveal_delay > MAX_REVEAL_DELAY {
            return Err(QuizConfigError::RevealDelayTooLong {
                max_ms: MAX_REVEAL_DELAY.as_millis(),
            });
        }

        Ok(QuizConfig {
            total_questions,
            reveal_delay,
        })
    }
}

impl QuizConfig {
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            total_questions: DEFAULT_TOTAL_QUESTIONS,
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_draft_uses_defaults() {
        let config = QuizConfigDraft::new().validate().unwrap();
        assert_eq!(config, QuizConfig::default());
        assert_eq!(config.total_questions(), 10);
        assert_eq!(config.reveal_delay(), Duration::from_secs(1));
    }

    #[test]
    fn zero_questions_is_rejected() {
        let draft = QuizConfigDraft {
            total_questions: Some(0),
            ..QuizConfigDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), QuizConfigError::NoQuestions);
    }

    #[test]
    fn long_reveal_delay_is_rejected() {
        let draft = QuizConfigDraft {
            reveal_delay: Some(Duration::from_secs(60)),
            ..QuizConfigDraft::default()
        };
        assert!(matches!(
            draft.validate(),
            Err(QuizConfigError::RevealDelayTooLong { .. })
        ));
    }

    #[test]
    fn zero_reveal_delay_is_allowed() {
        let draft = QuizConfigDraft {
            total_questions: Some(3),
            reveal_delay: Some(Duration::ZERO),
        };
        let config = draft.validate().unwrap();
        assert_eq!(config.total_questions(), 3);
        assert_eq!(config.reveal_delay(), Duration::ZERO);
    }
}
