mod game_result;
mod question;
mod quiz_config;
mod statistics;

pub use game_result::{GameResult, GameResultError};
pub use question::{Question, QuestionError};
pub use quiz_config::{
    DEFAULT_REVEAL_DELAY, DEFAULT_TOTAL_QUESTIONS, QuizConfig, QuizConfigDraft, QuizConfigError,
};
pub use statistics::{StatisticsAggregate, StatisticsError};
