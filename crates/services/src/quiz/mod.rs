mod factory;
mod progress;
mod session;
mod supplier;
mod view;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::{QuizError, QuizLoopError};
pub use factory::{MOVIES, Movie, QuestionFactory};
pub use progress::QuizProgress;
pub use session::{
    AnswerReveal, CompletionReason, QuizEvent, QuizPhase, QuizSession, QuizStep, RoundOutcome,
};
pub use supplier::{FixedQuestions, QuestionSupplier};
pub use view::RoundResultsView;
pub use workflow::{LoopEvent, QuizLoopService, RoundReport};
