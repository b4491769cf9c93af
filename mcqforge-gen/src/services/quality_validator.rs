//! Rule-based card quality validation
//!
//! Rules run in a fixed order and the first match wins; a card carries at
//! most one rejection reason. Rejections are collected, never raised.

use crate::models::{Card, RejectionReason, ValidationIssue, ValidationOutcome, MIN_OPTIONS};
use std::collections::HashSet;

/// Question openings that make a card read like a free-recall prompt
pub const FORBIDDEN_QUESTION_PREFIXES: [&str; 5] = ["what ", "which ", "where ", "how ", "why "];

const TRUE_FALSE_PAIRS: [[&str; 2]; 3] = [["true", "false"], ["t", "f"], ["yes", "no"]];

/// True if the options contain a complete true/false style pair
pub fn is_true_false_options(options: &[String]) -> bool {
    let lowered: HashSet<String> = options.iter().map(|o| o.trim().to_lowercase()).collect();
    TRUE_FALSE_PAIRS
        .iter()
        .any(|pair| pair.iter().all(|p| lowered.contains(*p)))
}

pub fn has_forbidden_question_prefix(question: &str) -> bool {
    let lowered = question.trim().to_lowercase();
    FORBIDDEN_QUESTION_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

pub fn has_minimum_choices(options: &[String], minimum: usize) -> bool {
    options.len() >= minimum
}

pub fn choices_outnumber_correct(options: &[String], correct_answers: &[String]) -> bool {
    options.len() > correct_answers.len()
}

/// A single structural predicate over a card
pub trait QualityRule: Send + Sync {
    /// Rule name for logging
    fn name(&self) -> &'static str;

    /// `Some(reason)` if the card must be rejected
    fn evaluate(&self, card: &Card) -> Option<RejectionReason>;
}

pub struct TrueFalseOptionsRule;

impl QualityRule for TrueFalseOptionsRule {
    fn name(&self) -> &'static str {
        "true_false_options"
    }

    fn evaluate(&self, card: &Card) -> Option<RejectionReason> {
        is_true_false_options(card.options()).then_some(RejectionReason::TrueFalseOptions)
    }
}

pub struct ForbiddenInterrogativeRule;

impl QualityRule for ForbiddenInterrogativeRule {
    fn name(&self) -> &'static str {
        "forbidden_interrogative"
    }

    fn evaluate(&self, card: &Card) -> Option<RejectionReason> {
        has_forbidden_question_prefix(card.question())
            .then_some(RejectionReason::ForbiddenInterrogative)
    }
}

pub struct MinimumChoicesRule {
    pub minimum: usize,
}

impl Default for MinimumChoicesRule {
    fn default() -> Self {
        Self {
            minimum: MIN_OPTIONS,
        }
    }
}

impl QualityRule for MinimumChoicesRule {
    fn name(&self) -> &'static str {
        "minimum_choices"
    }

    fn evaluate(&self, card: &Card) -> Option<RejectionReason> {
        (!has_minimum_choices(card.options(), self.minimum))
            .then_some(RejectionReason::TooFewChoices)
    }
}

pub struct ChoicesOutnumberAnswersRule;

impl QualityRule for ChoicesOutnumberAnswersRule {
    fn name(&self) -> &'static str {
        "choices_outnumber_answers"
    }

    fn evaluate(&self, card: &Card) -> Option<RejectionReason> {
        (!choices_outnumber_correct(card.options(), card.correct_answers()))
            .then_some(RejectionReason::AnswersOutnumberChoices)
    }
}

/// Ordered rule set
pub struct QualityValidator {
    rules: Vec<Box<dyn QualityRule>>,
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::standard()
    }
}

impl QualityValidator {
    /// The four standard rules in their fixed order
    pub fn standard() -> Self {
        Self::with_rules(vec![
            Box::new(TrueFalseOptionsRule),
            Box::new(ForbiddenInterrogativeRule),
            Box::new(MinimumChoicesRule::default()),
            Box::new(ChoicesOutnumberAnswersRule),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn QualityRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// First matching rule's reason, if any
    pub fn check(&self, card: &Card) -> Option<RejectionReason> {
        self.rules.iter().find_map(|rule| rule.evaluate(card))
    }

    /// Split cards into passed and failed, preserving input order
    pub fn validate(&self, cards: Vec<Card>) -> ValidationOutcome {
        let mut passed = Vec::new();
        let mut failed = Vec::new();

        for card in cards {
            match self.check(&card) {
                Some(reason) => {
                    tracing::debug!(question = %card.question(), %reason, "Card rejected");
                    failed.push(ValidationIssue { reason, card });
                }
                None => passed.push(card),
            }
        }

        ValidationOutcome::new(passed, failed)
    }
}
