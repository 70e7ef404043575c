//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{GameResultError, StatisticsError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::quiz::RoundOutcome;

/// Misuse of the quiz state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no question was requested")]
    NotAwaitingQuestion,
    #[error("no revealed answer to advance from")]
    NothingToAdvance,
    #[error(transparent)]
    Result(#[from] GameResultError),
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsServiceError {
    #[error("stored value for {key} is out of range: {value}")]
    InvalidPersistedValue { key: &'static str, value: i64 },
    #[error("value for {key} no longer fits in storage")]
    Overflow { key: &'static str },
    #[error(transparent)]
    Aggregate(#[from] StatisticsError),
    #[error(transparent)]
    BestGame(#[from] GameResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoopError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    /// The round finished but could not be recorded; `outcome` can be passed
    /// to `QuizLoopService::record` once storage recovers.
    #[error("failed to record finished round")]
    Record {
        outcome: RoundOutcome,
        #[source]
        source: StatisticsServiceError,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
