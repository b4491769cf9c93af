//! Multiple-choice flashcard

use serde::Serialize;
use thiserror::Error;

/// Minimum number of options on every card
pub const MIN_OPTIONS: usize = 6;

/// Card construction errors
///
/// Structural invariants are enforced here, not by the quality validator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    #[error("card needs at least {MIN_OPTIONS} options, got {0}")]
    TooFewOptions(usize),

    #[error("card needs at least one correct answer")]
    NoCorrectAnswer,

    #[error("options ({options}) must outnumber correct answers ({correct})")]
    AnswersNotOutnumbered { options: usize, correct: usize },

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct answer is not among the options: {0}")]
    AnswerNotInOptions(String),
}

/// A structured multiple-choice question
///
/// Invariants: options are distinct, `options.len() >= 6`, correct answers
/// are a non-empty subset of the options and strictly fewer than them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    question: String,
    multiple_choice: Vec<String>,
    correct_answers: Vec<String>,
    extra: String,
}

impl Card {
    pub fn new(
        question: impl Into<String>,
        multiple_choice: Vec<String>,
        correct_answers: Vec<String>,
        extra: impl Into<String>,
    ) -> Result<Self, CardError> {
        if multiple_choice.len() < MIN_OPTIONS {
            return Err(CardError::TooFewOptions(multiple_choice.len()));
        }
        if correct_answers.is_empty() {
            return Err(CardError::NoCorrectAnswer);
        }
        if multiple_choice.len() <= correct_answers.len() {
            return Err(CardError::AnswersNotOutnumbered {
                options: multiple_choice.len(),
                correct: correct_answers.len(),
            });
        }
        for (i, option) in multiple_choice.iter().enumerate() {
            if multiple_choice[..i].contains(option) {
                return Err(CardError::DuplicateOption(option.clone()));
            }
        }
        if let Some(missing) = correct_answers.iter().find(|a| !multiple_choice.contains(a)) {
            return Err(CardError::AnswerNotInOptions(missing.clone()));
        }

        Ok(Self {
            question: question.into(),
            multiple_choice,
            correct_answers,
            extra: extra.into(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Options in presentation order
    pub fn options(&self) -> &[String] {
        &self.multiple_choice
    }

    pub fn correct_answers(&self) -> &[String] {
        &self.correct_answers
    }

    /// Explanatory text shown on the back of the card
    pub fn extra(&self) -> &str {
        &self.extra
    }
}
