use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question image reference cannot be empty")]
    EmptyImage,
}

/// A single yes/no quiz question.
///
/// Produced by a question supplier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    image: String,
    correct_answer: bool,
}

impl Question {
    /// Build a question, trimming the text and image reference.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` or `QuestionError::EmptyImage` when
    /// either field is blank.
    pub fn new(
        text: impl Into<String>,
        image: impl Into<String>,
        correct_answer: bool,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let image = image.into().trim().to_owned();
        if image.is_empty() {
            return Err(QuestionError::EmptyImage);
        }

        Ok(Self {
            text,
            image,
            correct_answer,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Name of the image asset shown alongside the question.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }

    /// Whether `given` matches the expected answer.
    #[must_use]
    pub fn is_correct(&self, given: bool) -> bool {
        given == self.correct_answer
    }
}
