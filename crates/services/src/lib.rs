#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod quiz;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, QuizError, QuizLoopError, StatisticsServiceError};
pub use statistics_service::{StatKey, StatisticsService};

pub use quiz::{
    AnswerReveal, CompletionReason, FixedQuestions, LoopEvent, QuestionFactory, QuestionSupplier,
    QuizEvent, QuizLoopService, QuizPhase, QuizProgress, QuizSession, QuizStep, RoundOutcome,
    RoundReport, RoundResultsView,
};
