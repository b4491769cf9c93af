//! Job service facade
//!
//! The operations a transport collaborator calls: create a job, attach
//! sources, start it, and query status and stage results. Starting spawns
//! the orchestrator as a background task and returns a [`JobHandle`]
//! immediately with the provisional PARSING status.

use super::job_orchestrator::{stage_changed_event, JobOrchestrator};
use crate::config::ChunkingConfig;
use crate::db::JobRepository;
use crate::error::{JobError, JobResult};
use crate::models::{
    Card, Chunk, Job, JobStatus, OutputKind, Source, SourceContent, SourceKind, ValidationIssue,
    ValidationSummary,
};
use chrono::Utc;
use mcqforge_common::events::{EventBus, McqEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Status snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatusView {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub progress: u8,
    pub current_step: String,
}

/// Passed cards of a completed job
#[derive(Debug, Clone, Serialize)]
pub struct JobPreview {
    pub job_id: Uuid,
    pub cards: Vec<Card>,
    pub validation: ValidationSummary,
}

/// Validation detail of a completed job
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub job_id: Uuid,
    pub summary: ValidationSummary,
    pub failed_cards: Vec<ValidationIssue>,
}

/// Handle to a running job task
///
/// Dropping the handle does not stop the job.
#[derive(Debug)]
pub struct JobHandle {
    job_id: Uuid,
    provisional_status: JobStatus,
    join: JoinHandle<JobStatus>,
}

impl JobHandle {
    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Status reported to the caller at start time (always PARSING)
    pub fn provisional_status(&self) -> &JobStatus {
        &self.provisional_status
    }

    /// Wait for the job to reach DONE or FAILED
    pub async fn wait(self) -> JobResult<JobStatus> {
        self.join
            .await
            .map_err(|e| JobError::Internal(format!("job task {} aborted: {}", self.job_id, e)))
    }
}

#[derive(Clone)]
pub struct JobService {
    repo: Arc<dyn JobRepository>,
    orchestrator: Arc<JobOrchestrator>,
    event_bus: EventBus,
}

impl JobService {
    pub fn new(repo: Arc<dyn JobRepository>, event_bus: EventBus, chunking: ChunkingConfig) -> Self {
        let orchestrator = JobOrchestrator::new(Arc::clone(&repo), event_bus.clone(), chunking);
        Self::with_orchestrator(repo, event_bus, orchestrator)
    }

    /// Build around a preconfigured orchestrator sharing the same repository
    pub fn with_orchestrator(
        repo: Arc<dyn JobRepository>,
        event_bus: EventBus,
        orchestrator: JobOrchestrator,
    ) -> Self {
        Self {
            repo,
            orchestrator: Arc::new(orchestrator),
            event_bus,
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub async fn create_job(&self, course_name: &str, outputs: Vec<OutputKind>) -> JobResult<Job> {
        let course_name = course_name.trim();
        if course_name.is_empty() {
            return Err(JobError::InvalidInput("course name must not be empty".to_string()));
        }

        let job = Job::new(course_name, outputs);
        self.repo.insert(job.clone()).await?;

        tracing::info!(job_id = %job.job_id, course = %job.course_name, "Job created");
        self.event_bus.emit_lossy(McqEvent::JobCreated {
            job_id: job.job_id,
            course_name: job.course_name.clone(),
            timestamp: Utc::now(),
        });

        Ok(job)
    }

    /// Decode and attach an upload; returns the new source id
    pub async fn attach_source(
        &self,
        job_id: Uuid,
        kind: SourceKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> JobResult<Uuid> {
        // NotFound takes precedence over payload errors
        self.repo.get(job_id).await?;

        if bytes.is_empty() {
            return Err(JobError::InvalidInput("empty file".to_string()));
        }

        let filename = if filename.trim().is_empty() {
            "upload"
        } else {
            filename
        };
        let source = Source::new(kind, filename, SourceContent::from_bytes(kind, bytes));
        let source_id = source.source_id;
        let decoded = source.content.is_decoded();

        self.repo.attach_source(job_id, source).await?;

        tracing::info!(
            job_id = %job_id,
            source_id = %source_id,
            filename,
            kind = kind.as_str(),
            decoded,
            "Source attached"
        );
        self.event_bus.emit_lossy(McqEvent::SourceAttached {
            job_id,
            source_id,
            filename: filename.to_string(),
            kind: kind.as_str().to_string(),
            decoded,
            timestamp: Utc::now(),
        });

        Ok(source_id)
    }

    /// Start or restart a job
    ///
    /// Fails with `InvalidState` (and changes nothing) when the job has no
    /// sources or is not QUEUED/FAILED.
    pub async fn start_job(&self, job_id: Uuid) -> JobResult<JobHandle> {
        let transition = self.repo.claim_for_start(job_id).await?;
        let snapshot = self.repo.get(job_id).await?;

        tracing::info!(
            job_id = %job_id,
            from = transition.old_state.label(),
            source_count = snapshot.sources.len(),
            "Job started"
        );

        self.event_bus.emit_lossy(McqEvent::JobStarted {
            job_id,
            source_count: snapshot.sources.len(),
            timestamp: Utc::now(),
        });
        self.event_bus.emit_lossy(stage_changed_event(
            &transition,
            snapshot.progress,
            snapshot.current_step.clone(),
        ));

        let orchestrator = Arc::clone(&self.orchestrator);
        let join = tokio::spawn(async move {
            let status = orchestrator.execute_job(job_id).await;
            tracing::info!(job_id = %job_id, state = status.label(), "Background job task finished");
            status
        });

        Ok(JobHandle {
            job_id,
            provisional_status: transition.new_state,
            join,
        })
    }

    pub async fn status(&self, job_id: Uuid) -> JobResult<JobStatusView> {
        let job = self.repo.get(job_id).await?;
        tracing::debug!(job_id = %job_id, state = job.status.label(), "Status query");
        Ok(JobStatusView {
            job_id,
            status: job.status,
            progress: job.progress,
            current_step: job.current_step,
        })
    }

    /// Chunk list, available from CHUNKING onward
    pub async fn chunks(&self, job_id: Uuid) -> JobResult<Vec<Chunk>> {
        let job = self.repo.get(job_id).await?;
        if !job.status.chunks_available() {
            return Err(JobError::InvalidState(format!(
                "chunks not ready (status {})",
                job.status.label()
            )));
        }
        Ok(job.chunks)
    }

    /// Passed cards and summary of a DONE job
    pub async fn preview(&self, job_id: Uuid) -> JobResult<JobPreview> {
        let job = self.completed_job(job_id).await?;
        Ok(JobPreview {
            job_id,
            validation: job.validation.unwrap_or_default(),
            cards: job.cards,
        })
    }

    /// Summary and rejected cards of a DONE job
    pub async fn validation_report(&self, job_id: Uuid) -> JobResult<ValidationReport> {
        let job = self.completed_job(job_id).await?;
        Ok(ValidationReport {
            job_id,
            summary: job.validation.unwrap_or_default(),
            failed_cards: job.failed_cards,
        })
    }

    async fn completed_job(&self, job_id: Uuid) -> JobResult<Job> {
        let job = self.repo.get(job_id).await?;
        if job.status != JobStatus::Done {
            return Err(JobError::InvalidState(format!(
                "job not complete (status {})",
                job.status.label()
            )));
        }
        Ok(job)
    }
}
