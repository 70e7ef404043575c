use quiz_core::model::Question;

/// Source of quiz questions, pulled one at a time.
pub trait QuestionSupplier {
    /// Next question, or `None` once the supplier has nothing left.
    fn next_question(&mut self) -> Option<Question>;

    /// Make the full question pool available again.
    fn reset(&mut self);
}

impl<T: QuestionSupplier + ?Sized> QuestionSupplier for Box<T> {
    fn next_question(&mut self) -> Option<Question> {
        (**self).next_question()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Serves a predefined list in order.
#[derive(Debug, Clone, Default)]
pub struct FixedQuestions {
    questions: Vec<Question>,
    cursor: usize,
}

impl FixedQuestions {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.cursor)
    }
}

impl QuestionSupplier for FixedQuestions {
    fn next_question(&mut self) -> Option<Question> {
        let question = self.questions.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(question)
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize) -> Question {
        Question::new(format!("Q{n}"), format!("img{n}"), n % 2 == 0).unwrap()
    }

    #[test]
    fn serves_in_order_then_runs_out() {
        let mut supplier = FixedQuestions::new(vec![question(1), question(2)]);
        assert_eq!(supplier.next_question().unwrap().text(), "Q1");
        assert_eq!(supplier.next_question().unwrap().text(), "Q2");
        assert!(supplier.next_question().is_none());
        assert_eq!(supplier.remaining(), 0);
    }

    #[test]
    fn reset_starts_over() {
        let mut supplier: Box<dyn QuestionSupplier> =
            Box::new(FixedQuestions::new(vec![question(1)]));
        assert!(supplier.next_question().is_some());
        assert!(supplier.next_question().is_none());
        supplier.reset();
        assert_eq!(supplier.next_question().unwrap().text(), "Q1");
    }
}
