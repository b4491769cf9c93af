//! Job state machine
//!
//! QUEUED → PARSING → CHUNKING → GENERATING → DONE, with FAILED reachable from
//! any running stage. A job may be (re)started only from QUEUED or FAILED.

use super::{Card, Chunk, Source, ValidationIssue, ValidationOutcome, ValidationSummary};
use crate::error::{JobError, JobResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Running pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStage {
    Parsing,
    Chunking,
    Generating,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobStage::Parsing => "PARSING",
            JobStage::Chunking => "CHUNKING",
            JobStage::Generating => "GENERATING",
        })
    }
}

/// Structured failure payload carried by [`JobStatus::Failed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    /// Stage during which the error was raised
    pub stage: JobStage,
    pub message: String,
}

/// Job status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "failure", rename_all = "UPPERCASE")]
pub enum JobStatus {
    Queued,
    Parsing,
    Chunking,
    Generating,
    Done,
    Failed(JobFailure),
}

impl JobStatus {
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Parsing => "PARSING",
            JobStatus::Chunking => "CHUNKING",
            JobStatus::Generating => "GENERATING",
            JobStatus::Done => "DONE",
            JobStatus::Failed(_) => "FAILED",
        }
    }

    /// Advisory progress percentage; FAILED keeps whatever was reached
    pub fn progress_marker(&self) -> Option<u8> {
        match self {
            JobStatus::Queued => Some(0),
            JobStatus::Parsing => Some(20),
            JobStatus::Chunking => Some(45),
            JobStatus::Generating => Some(75),
            JobStatus::Done => Some(100),
            JobStatus::Failed(_) => None,
        }
    }

    /// Human-readable step label
    pub fn step_label(&self) -> String {
        match self {
            JobStatus::Queued => "queued".to_string(),
            JobStatus::Parsing => "parsing source text".to_string(),
            JobStatus::Chunking => "topic segmentation".to_string(),
            JobStatus::Generating => "card generation".to_string(),
            JobStatus::Done => "completed".to_string(),
            JobStatus::Failed(failure) => format!("failed: {}", failure.message),
        }
    }

    /// The running stage, if any
    pub fn stage(&self) -> Option<JobStage> {
        match self {
            JobStatus::Parsing => Some(JobStage::Parsing),
            JobStatus::Chunking => Some(JobStage::Chunking),
            JobStatus::Generating => Some(JobStage::Generating),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed(_))
    }

    /// Start/restart is permitted only from QUEUED or FAILED
    pub fn can_start(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Failed(_))
    }

    /// Chunks are queryable once CHUNKING has been reached
    pub fn chunks_available(&self) -> bool {
        matches!(
            self,
            JobStatus::Chunking | JobStatus::Generating | JobStatus::Done
        )
    }

    /// Legal edges of the state machine
    pub fn can_transition_to(&self, next: &JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Queued, JobStatus::Parsing) => true,
            (JobStatus::Failed(_), JobStatus::Parsing) => true,
            (JobStatus::Parsing, JobStatus::Chunking) => true,
            (JobStatus::Chunking, JobStatus::Generating) => true,
            (JobStatus::Generating, JobStatus::Done) => true,
            (current, JobStatus::Failed(_)) => current.stage().is_some(),
            _ => false,
        }
    }
}

/// Requested export kinds, recorded for the downstream exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Csv,
    Apkg,
}

/// State transition record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub job_id: Uuid,
    pub old_state: JobStatus,
    pub new_state: JobStatus,
    pub transitioned_at: DateTime<Utc>,
}

/// Job record
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub job_id: Uuid,
    pub course_name: String,
    pub outputs: Vec<OutputKind>,
    pub status: JobStatus,
    /// Percentage complete (0 - 100)
    pub progress: u8,
    pub current_step: String,
    pub sources: Vec<Source>,
    pub chunks: Vec<Chunk>,
    /// Cards that passed validation, in generation order
    pub cards: Vec<Card>,
    pub validation: Option<ValidationSummary>,
    pub failed_cards: Vec<ValidationIssue>,
    pub transitions: Vec<StateTransition>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create new job in QUEUED state
    pub fn new(course_name: impl Into<String>, outputs: Vec<OutputKind>) -> Self {
        let outputs = if outputs.is_empty() {
            vec![OutputKind::Csv]
        } else {
            outputs
        };
        Self {
            job_id: Uuid::new_v4(),
            course_name: course_name.into(),
            outputs,
            status: JobStatus::Queued,
            progress: 0,
            current_step: JobStatus::Queued.step_label(),
            sources: Vec::new(),
            chunks: Vec::new(),
            cards: Vec::new(),
            validation: None,
            failed_cards: Vec::new(),
            transitions: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    /// Transition to new status along a legal edge
    pub fn transition_to(&mut self, new_status: JobStatus) -> JobResult<StateTransition> {
        if !self.status.can_transition_to(&new_status) {
            return Err(JobError::InvalidState(format!(
                "job {} cannot move from {} to {}",
                self.job_id,
                self.status.label(),
                new_status.label()
            )));
        }

        let transition = StateTransition {
            job_id: self.job_id,
            old_state: self.status.clone(),
            new_state: new_status.clone(),
            transitioned_at: Utc::now(),
        };

        if let Some(progress) = new_status.progress_marker() {
            self.progress = progress;
        }
        self.current_step = new_status.step_label();

        match new_status {
            JobStatus::Parsing => {
                self.started_at = Some(transition.transitioned_at);
                self.ended_at = None;
            }
            JobStatus::Done | JobStatus::Failed(_) => {
                self.ended_at = Some(transition.transitioned_at);
            }
            _ => {}
        }

        self.status = new_status;
        self.transitions.push(transition.clone());
        Ok(transition)
    }

    /// Check-and-set for start/restart
    ///
    /// Requires at least one source and a startable status. Clears results
    /// left by a previous failed run, then moves to PARSING. Callers must hold
    /// exclusive access to the job for the whole call.
    pub fn begin_run(&mut self) -> JobResult<StateTransition> {
        if self.sources.is_empty() {
            return Err(JobError::InvalidState(
                "at least one source is required".to_string(),
            ));
        }
        if !self.status.can_start() {
            return Err(JobError::InvalidState(format!(
                "job already started (status {})",
                self.status.label()
            )));
        }

        self.chunks.clear();
        self.cards.clear();
        self.failed_cards.clear();
        self.validation = None;

        self.transition_to(JobStatus::Parsing)
    }

    pub fn record_outcome(&mut self, outcome: ValidationOutcome) {
        self.cards = outcome.passed;
        self.failed_cards = outcome.failed;
        self.validation = Some(outcome.summary);
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
