//! Validation outcome types

use super::Card;
use mcqforge_common::events::ValidationCounts;
use serde::Serialize;
use std::fmt;

/// Why a card was rejected (exactly one per rejected card)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    TrueFalseOptions,
    ForbiddenInterrogative,
    TooFewChoices,
    AnswersOutnumberChoices,
}

impl RejectionReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::TrueFalseOptions => "true/false style options are forbidden",
            RejectionReason::ForbiddenInterrogative => "question starts with forbidden interrogative",
            RejectionReason::TooFewChoices => "minimum of 6 choices required",
            RejectionReason::AnswersOutnumberChoices => "choices must outnumber correct answers",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A rejected card paired with the reason it failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub reason: RejectionReason,
    pub card: Card,
}

/// Pass/fail tallies; `total == passed + failed` by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationSummary {
    total: usize,
    passed: usize,
    failed: usize,
}

impl ValidationSummary {
    pub fn new(passed: usize, failed: usize) -> Self {
        Self {
            total: passed + failed,
            passed,
            failed,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl From<ValidationSummary> for ValidationCounts {
    fn from(summary: ValidationSummary) -> Self {
        ValidationCounts {
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
        }
    }
}

/// Full validator output, both lists in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub passed: Vec<Card>,
    pub failed: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

impl ValidationOutcome {
    pub fn new(passed: Vec<Card>, failed: Vec<ValidationIssue>) -> Self {
        let summary = ValidationSummary::new(passed.len(), failed.len());
        Self {
            passed,
            failed,
            summary,
        }
    }
}
