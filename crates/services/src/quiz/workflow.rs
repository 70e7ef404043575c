use std::sync::Arc;

use chrono::Local;
use quiz_core::model::StatisticsAggregate;

use super::session::{QuizEvent, QuizSession, QuizStep, RoundOutcome};
use super::supplier::QuestionSupplier;
use super::view::RoundResultsView;
use crate::error::QuizLoopError;
use crate::statistics_service::StatisticsService;

/// Everything the presentation needs once a round is over.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub statistics: StatisticsAggregate,
    pub view: RoundResultsView,
}

/// Result of starting or advancing a round through the loop service.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopEvent {
    Question(QuizStep),
    Finished(RoundReport),
}

/// Drives sessions and records finished rounds into statistics.
#[derive(Clone)]
pub struct QuizLoopService {
    statistics: Arc<StatisticsService>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(statistics: Arc<StatisticsService>) -> Self {
        Self { statistics }
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    /// Start a round; an empty supplier finishes (and is recorded) right away.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError` if the round cannot start or recording fails.
    pub async fn start<S: QuestionSupplier>(
        &self,
        session: &mut QuizSession<S>,
    ) -> Result<LoopEvent, QuizLoopError> {
        let event = session.start()?;
        self.settle(event).await
    }

    /// Advance past a revealed answer, recording the round when it ends.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError` if there is nothing to advance or recording fails.
    pub async fn advance<S: QuestionSupplier>(
        &self,
        session: &mut QuizSession<S>,
    ) -> Result<LoopEvent, QuizLoopError> {
        let event = session.advance()?;
        self.settle(event).await
    }

    /// Record a finished round, e.g. retrying one carried by `QuizLoopError::Record`.
    ///
    /// # Errors
    ///
    /// Returns `QuizLoopError::Record` with the outcome if persistence fails.
    pub async fn record(&self, outcome: RoundOutcome) -> Result<RoundReport, QuizLoopError> {
        let statistics = match self.statistics.record(&outcome.result).await {
            Ok(statistics) => statistics,
            Err(source) => {
                tracing::error!(error = %source, "could not record finished round");
                return Err(QuizLoopError::Record { outcome, source });
            }
        };
        let message = statistics.summary_text(&outcome.result, &Local);
        let view = RoundResultsView::for_outcome(&outcome, message);
        Ok(RoundReport {
            outcome,
            statistics,
            view,
        })
    }

    async fn settle(&self, event: QuizEvent) -> Result<LoopEvent, QuizLoopError> {
        match event {
            QuizEvent::Question(step) => Ok(LoopEvent::Question(step)),
            QuizEvent::RoundComplete(outcome) => {
                Ok(LoopEvent::Finished(self.record(outcome).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::supplier::FixedQuestions;
    use quiz_core::model::{Question, QuizConfig};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryStore;

    fn loop_service() -> QuizLoopService {
        QuizLoopService::new(Arc::new(StatisticsService::new(Arc::new(
            InMemoryStore::new(),
        ))))
    }

    #[tokio::test]
    async fn empty_supplier_is_recorded_as_zero_question_round() {
        let svc = loop_service();
        let mut session =
            QuizSession::new(FixedQuestions::default(), &QuizConfig::default(), fixed_clock());

        let LoopEvent::Finished(report) = svc.start(&mut session).await.unwrap() else {
            panic!("expected an immediate finish");
        };
        assert_eq!(report.view.title, "Out of questions");
        assert_eq!(report.statistics.games_played(), 1);
        assert_eq!(report.statistics.total_asked(), 0);
    }

    #[tokio::test]
    async fn advance_without_reveal_is_an_error() {
        let svc = loop_service();
        let questions = FixedQuestions::new(vec![Question::new("Q", "img", true).unwrap()]);
        let mut session = QuizSession::new(questions, &QuizConfig::default(), fixed_clock());
        svc.start(&mut session).await.unwrap();

        let err = svc.advance(&mut session).await.unwrap_err();
        assert!(matches!(
            err,
            QuizLoopError::Quiz(crate::error::QuizError::NothingToAdvance)
        ));
        assert_eq!(svc.statistics().games_played().await.unwrap(), 0);
    }
}
