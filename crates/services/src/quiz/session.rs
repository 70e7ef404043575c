use std::fmt;

use quiz_core::Clock;
use quiz_core::model::{GameResult, Question, QuizConfig};

use super::progress::QuizProgress;
use super::supplier::QuestionSupplier;
use crate::error::QuizError;

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Where a round currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    AwaitingQuestion,
    QuestionShown,
    AnswerRevealed,
    RoundComplete,
}

/// Render instruction for a freshly received question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStep {
    pub question: String,
    pub image: String,
    /// Position label such as `3/10`.
    pub question_number: String,
}

/// Feedback for a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerReveal {
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    QuotaReached,
    SupplierExhausted,
}

/// Final tally of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub result: GameResult,
    pub reason: CompletionReason,
}

/// What the caller should present after `start` or `advance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Question(QuizStep),
    RoundComplete(RoundOutcome),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One playthrough of a fixed number of yes/no questions.
///
/// `answer` and `advance` are separate steps so the caller owns the dwell
/// delay between showing feedback and moving on.
pub struct QuizSession<S> {
    supplier: S,
    clock: Clock,
    total_questions: u32,
    asked: u32,
    correct: u32,
    current: Option<Question>,
    phase: QuizPhase,
    started: bool,
}

impl<S: QuestionSupplier> QuizSession<S> {
    #[must_use]
    pub fn new(supplier: S, config: &QuizConfig, clock: Clock) -> Self {
        Self {
            supplier,
            clock,
            total_questions: config.total_questions(),
            asked: 0,
            correct: 0,
            current: None,
            phase: QuizPhase::AwaitingQuestion,
            started: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn asked_count(&self) -> u32 {
        self.asked
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// True between `start` and round completion.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.started && self.phase != QuizPhase::RoundComplete
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.total_questions,
            asked: self.asked,
            correct: self.correct,
            remaining: self.total_questions.saturating_sub(self.asked),
            is_complete: self.phase == QuizPhase::RoundComplete,
        }
    }

    /// Begin a new round and pull its first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RoundInProgress` if the current round has not finished.
    pub fn start(&mut self) -> Result<QuizEvent, QuizError> {
        if self.is_in_progress() {
            return Err(QuizError::RoundInProgress);
        }

        self.asked = 0;
        self.correct = 0;
        self.current = None;
        self.phase = QuizPhase::AwaitingQuestion;
        self.started = true;
        self.supplier.reset();

        tracing::debug!(total_questions = self.total_questions, "quiz round started");
        self.request_next()
    }

    /// Accept a question delivered by the supplier.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAwaitingQuestion` unless a question was requested.
    pub fn receive_question(&mut self, question: Question) -> Result<QuizStep, QuizError> {
        if !self.started || self.phase != QuizPhase::AwaitingQuestion {
            return Err(QuizError::NotAwaitingQuestion);
        }

        let step = QuizStep {
            question: question.text().to_owned(),
            image: question.image().to_owned(),
            question_number: format!("{}/{}", self.asked + 1, self.total_questions),
        };
        self.current = Some(question);
        self.phase = QuizPhase::QuestionShown;
        Ok(step)
    }

    /// The supplier ran dry before the quota; finish with the tally so far.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotAwaitingQuestion` unless a question was requested.
    pub fn supplier_exhausted(&mut self) -> Result<RoundOutcome, QuizError> {
        if !self.started || self.phase != QuizPhase::AwaitingQuestion {
            return Err(QuizError::NotAwaitingQuestion);
        }
        tracing::warn!(
            asked = self.asked,
            total_questions = self.total_questions,
            "question supplier exhausted early"
        );
        self.finish(CompletionReason::SupplierExhausted)
    }

    /// Submit an answer for the shown question.
    ///
    /// Returns `None` and changes nothing when no question is being shown.
    pub fn answer(&mut self, given: bool) -> Option<AnswerReveal> {
        if self.phase != QuizPhase::QuestionShown {
            return None;
        }
        let is_correct = self.current.as_ref()?.is_correct(given);
        if is_correct {
            self.correct += 1;
        }
        self.phase = QuizPhase::AnswerRevealed;
        Some(AnswerReveal { is_correct })
    }

    /// Move past a revealed answer: either the next question or the round result.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NothingToAdvance` if no answer has been revealed.
    pub fn advance(&mut self) -> Result<QuizEvent, QuizError> {
        if self.phase != QuizPhase::AnswerRevealed {
            return Err(QuizError::NothingToAdvance);
        }

        self.current = None;
        self.asked += 1;
        if self.asked >= self.total_questions {
            return Ok(QuizEvent::RoundComplete(
                self.finish(CompletionReason::QuotaReached)?,
            ));
        }

        self.phase = QuizPhase::AwaitingQuestion;
        self.request_next()
    }

    fn request_next(&mut self) -> Result<QuizEvent, QuizError> {
        match self.supplier.next_question() {
            Some(question) => Ok(QuizEvent::Question(self.receive_question(question)?)),
            None => Ok(QuizEvent::RoundComplete(self.supplier_exhausted()?)),
        }
    }

    fn finish(&mut self, reason: CompletionReason) -> Result<RoundOutcome, QuizError> {
        // An early finish reports what was actually asked.
        let total = match reason {
            CompletionReason::QuotaReached => self.total_questions,
            CompletionReason::SupplierExhausted => self.asked,
        };
        let result = GameResult::new(self.correct, total, self.clock.now())?;
        self.current = None;
        self.phase = QuizPhase::RoundComplete;

        tracing::debug!(
            correct = result.correct(),
            total = result.total(),
            ?reason,
            "quiz round complete"
        );
        Ok(RoundOutcome { result, reason })
    }
}

impl<S> fmt::Debug for QuizSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("total_questions", &self.total_questions)
            .field("asked", &self.asked)
            .field("correct", &self.correct)
            .field("current", &self.current)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::supplier::FixedQuestions;
    use quiz_core::model::QuizConfigDraft;
    use quiz_core::time::{fixed_clock, fixed_now};

    fn questions(answers: &[bool]) -> FixedQuestions {
        FixedQuestions::new(
            answers
                .iter()
                .enumerate()
                .map(|(i, &answer)| Question::new(format!("Q{i}"), format!("img{i}"), answer).unwrap())
                .collect(),
        )
    }

    fn config(total: u32) -> QuizConfig {
        QuizConfigDraft {
            total_questions: Some(total),
            ..QuizConfigDraft::default()
        }
        .validate()
        .unwrap()
    }

    fn session(answers: &[bool], total: u32) -> QuizSession<FixedQuestions> {
        QuizSession::new(questions(answers), &config(total), fixed_clock())
    }

    fn assert_counters_bounded(s: &QuizSession<FixedQuestions>) {
        // A revealed answer is counted as correct before `advance` counts it as asked.
        let answered = s.asked_count() + u32::from(s.phase() == QuizPhase::AnswerRevealed);
        assert!(s.correct_count() <= answered);
        assert!(s.asked_count() <= s.total_questions());
    }

    #[test]
    fn start_shows_first_question_with_position_label() {
        let mut s = session(&[true, false, true], 3);
        let event = s.start().unwrap();
        assert_eq!(
            event,
            QuizEvent::Question(QuizStep {
                question: "Q0".into(),
                image: "img0".into(),
                question_number: "1/3".into(),
            })
        );
        assert_eq!(s.phase(), QuizPhase::QuestionShown);
        assert!(s.is_in_progress());
    }

    #[test]
    fn perfect_round_reports_full_score() {
        let answers = [true, false, true, true, false, false, true, false, true, true];
        let mut s = session(&answers, 10);
        s.start().unwrap();

        let mut outcome = None;
        while outcome.is_none() {
            let expected = s.current_question().unwrap().correct_answer();
            let reveal = s.answer(expected).unwrap();
            assert!(reveal.is_correct);
            assert_counters_bounded(&s);
            match s.advance().unwrap() {
                QuizEvent::Question(_) => assert_counters_bounded(&s),
                QuizEvent::RoundComplete(done) => outcome = Some(done),
            }
        }

        let outcome = outcome.unwrap();
        assert_eq!(outcome.reason, CompletionReason::QuotaReached);
        assert_eq!(outcome.result.correct(), 10);
        assert_eq!(outcome.result.total(), 10);
        assert_eq!(outcome.result.date(), fixed_now());
        assert!(!s.is_in_progress());
    }

    #[test]
    fn wrong_answers_are_not_counted() {
        let mut s = session(&[true, true], 2);
        s.start().unwrap();
        assert_eq!(s.answer(false), Some(AnswerReveal { is_correct: false }));
        s.advance().unwrap();
        assert_eq!(s.answer(true), Some(AnswerReveal { is_correct: true }));

        let QuizEvent::RoundComplete(outcome) = s.advance().unwrap() else {
            panic!("round should be complete");
        };
        assert_eq!(outcome.result.correct(), 1);
        assert_eq!(outcome.result.total(), 2);
    }

    #[test]
    fn answer_without_question_is_a_noop() {
        let mut s = session(&[true], 1);
        assert_eq!(s.answer(true), None);
        assert_eq!(s.phase(), QuizPhase::AwaitingQuestion);
        assert_eq!(s.asked_count(), 0);
        assert_eq!(s.correct_count(), 0);
    }

    #[test]
    fn second_answer_before_advance_is_ignored() {
        let mut s = session(&[true, true], 2);
        s.start().unwrap();
        assert!(s.answer(true).is_some());
        assert_eq!(s.answer(true), None);
        assert_eq!(s.correct_count(), 1);
    }

    #[test]
    fn advance_requires_a_revealed_answer() {
        let mut s = session(&[true], 1);
        assert!(matches!(s.advance(), Err(QuizError::NothingToAdvance)));
        s.start().unwrap();
        assert!(matches!(s.advance(), Err(QuizError::NothingToAdvance)));
    }

    #[test]
    fn start_is_rejected_mid_round() {
        let mut s = session(&[true, true], 2);
        s.start().unwrap();
        assert!(matches!(s.start(), Err(QuizError::RoundInProgress)));

        s.answer(true);
        s.advance().unwrap();
        assert!(matches!(s.start(), Err(QuizError::RoundInProgress)));
    }

    #[test]
    fn exhausted_supplier_finishes_with_asked_count() {
        let mut s = session(&[true, false], 5);
        s.start().unwrap();
        s.answer(true);
        s.advance().unwrap();
        s.answer(true);

        let QuizEvent::RoundComplete(outcome) = s.advance().unwrap() else {
            panic!("supplier should be exhausted");
        };
        assert_eq!(outcome.reason, CompletionReason::SupplierExhausted);
        assert_eq!(outcome.result.correct(), 1);
        assert_eq!(outcome.result.total(), 2);
        assert_eq!(s.phase(), QuizPhase::RoundComplete);
    }

    #[test]
    fn empty_supplier_completes_immediately() {
        let mut s = session(&[], 10);
        let QuizEvent::RoundComplete(outcome) = s.start().unwrap() else {
            panic!("no questions to show");
        };
        assert_eq!(outcome.result.total(), 0);
        assert_eq!(outcome.reason, CompletionReason::SupplierExhausted);
    }

    #[test]
    fn restart_after_completion_resets_tally_and_supplier() {
        let mut s = session(&[true], 1);
        s.start().unwrap();
        s.answer(true);
        assert!(matches!(s.advance().unwrap(), QuizEvent::RoundComplete(_)));

        let event = s.start().unwrap();
        assert!(matches!(event, QuizEvent::Question(ref step) if step.question == "Q0"));
        assert_eq!(s.asked_count(), 0);
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.progress().remaining, 1);
    }

    #[test]
    fn unsolicited_question_is_rejected() {
        let mut s = session(&[true, true], 2);
        let extra = Question::new("Extra", "img", true).unwrap();
        assert!(matches!(
            s.receive_question(extra.clone()),
            Err(QuizError::NotAwaitingQuestion)
        ));

        s.start().unwrap();
        assert!(matches!(
            s.receive_question(extra),
            Err(QuizError::NotAwaitingQuestion)
        ));
        assert!(matches!(
            s.supplier_exhausted(),
            Err(QuizError::NotAwaitingQuestion)
        ));
    }

    #[test]
    fn progress_tracks_position() {
        let mut s = session(&[true, false, true], 3);
        s.start().unwrap();
        s.answer(true);
        s.advance().unwrap();

        let progress = s.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.asked, 1);
        assert_eq!(progress.correct, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_complete);
    }
}
