//! Job orchestrator
//!
//! Drives a started job through its stages:
//! PARSING → CHUNKING → GENERATING → DONE
//!
//! Each stage lives in its own `phase_*` module. The job is already in
//! PARSING when execution begins (the start request claims it). Any error
//! raised by a stage is caught here and turns the job FAILED; nothing is
//! retried. Stage transitions are broadcast on the event bus.

use crate::config::ChunkingConfig;
use crate::db::JobRepository;
use crate::models::{JobFailure, JobStage, JobStatus, StateTransition};
use crate::services::{CardSynthesizer, ChunkBuilder, QualityValidator, TopicSegmenter};
use anyhow::Result;
use chrono::Utc;
use mcqforge_common::events::{EventBus, McqEvent};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

mod phase_chunking;
mod phase_generating;
mod phase_parsing;

pub struct JobOrchestrator {
    repo: Arc<dyn JobRepository>,
    event_bus: EventBus,
    segmenter: TopicSegmenter,
    chunk_builder: ChunkBuilder,
    synthesizer: CardSynthesizer,
    validator: QualityValidator,
}

impl JobOrchestrator {
    pub fn new(repo: Arc<dyn JobRepository>, event_bus: EventBus, chunking: ChunkingConfig) -> Self {
        Self {
            repo,
            event_bus,
            segmenter: TopicSegmenter::new(),
            chunk_builder: ChunkBuilder::new(&chunking),
            synthesizer: CardSynthesizer::new(),
            validator: QualityValidator::standard(),
        }
    }

    /// Replace the validation rule set
    pub fn with_validator(mut self, validator: QualityValidator) -> Self {
        tracing::info!(rules = ?validator.rule_names(), "Custom validation rules installed");
        self.validator = validator;
        self
    }

    /// Run a claimed job to DONE or FAILED and return the terminal status
    pub async fn execute_job(&self, job_id: Uuid) -> JobStatus {
        let start_time = Instant::now();
        tracing::info!(job_id = %job_id, "Starting job workflow");

        match self.run_stages(job_id, start_time).await {
            Ok(status) => status,
            Err(e) => self.handle_failure(job_id, &e).await,
        }
    }

    async fn run_stages(&self, job_id: Uuid, start_time: Instant) -> Result<JobStatus> {
        // Stage 1: PARSING (entered when the job was claimed)
        let text = self.phase_parsing(job_id).await?;

        // Stage 2: CHUNKING
        let chunks = self.phase_chunking(job_id, &text).await?;
        let chunk_count = chunks.len();

        // Stage 3: GENERATING
        let summary = self.phase_generating(job_id, &chunks).await?;

        // DONE
        let transition = self.repo.transition(job_id, JobStatus::Done).await?;
        self.broadcast_transition(&transition).await;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!(
            job_id = %job_id,
            chunk_count,
            total = summary.total(),
            passed = summary.passed(),
            failed = summary.failed(),
            duration_ms,
            "Job workflow completed"
        );

        self.event_bus.emit_lossy(McqEvent::JobCompleted {
            job_id,
            chunk_count,
            validation: summary.into(),
            duration_ms,
            timestamp: Utc::now(),
        });

        Ok(JobStatus::Done)
    }

    /// Convert a stage error into FAILED
    ///
    /// The failing stage is whatever stage the job is in when the error
    /// surfaces. If the job can no longer be read or updated the failure is
    /// only logged.
    async fn handle_failure(&self, job_id: Uuid, error: &anyhow::Error) -> JobStatus {
        tracing::error!(job_id = %job_id, error = ?error, "Job workflow failed");

        let stage = match self.repo.get(job_id).await {
            Ok(job) => job.status.stage().unwrap_or(JobStage::Parsing),
            Err(_) => JobStage::Parsing,
        };
        let failure = JobFailure {
            stage,
            message: error.to_string(),
        };
        let status = JobStatus::Failed(failure.clone());

        match self.repo.transition(job_id, status.clone()).await {
            Ok(transition) => self.broadcast_transition(&transition).await,
            Err(mark_error) => {
                tracing::error!(
                    job_id = %job_id,
                    error = %mark_error,
                    "Failed to mark job as failed"
                );
            }
        }

        self.event_bus.emit_lossy(McqEvent::JobFailed {
            job_id,
            stage: failure.stage.to_string(),
            error_message: failure.message,
            timestamp: Utc::now(),
        });

        status
    }

    /// Broadcast a stage change with the job's current progress
    async fn broadcast_transition(&self, transition: &StateTransition) {
        let (progress, current_step) = match self.repo.get(transition.job_id).await {
            Ok(job) => (job.progress, job.current_step),
            Err(_) => (
                transition.new_state.progress_marker().unwrap_or(0),
                transition.new_state.step_label(),
            ),
        };

        self.event_bus.emit_lossy(stage_changed_event(transition, progress, current_step));
    }
}

/// Event for a state transition
pub(crate) fn stage_changed_event(
    transition: &StateTransition,
    progress: u8,
    current_step: String,
) -> McqEvent {
    McqEvent::JobStageChanged {
        job_id: transition.job_id,
        old_state: transition.old_state.label().to_string(),
        new_state: transition.new_state.label().to_string(),
        progress,
        current_step,
        timestamp: transition.transitioned_at,
    }
}
