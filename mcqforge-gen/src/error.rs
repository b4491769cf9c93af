//! Error types for mcqforge-gen
//!
//! `JobError` is what a transport collaborator sees. Per-card validation
//! rejections are data, never errors; stage failures are caught by the
//! orchestrator and recorded on the job as [`crate::models::JobFailure`].

use thiserror::Error;

/// Caller-facing job error
#[derive(Debug, Error)]
pub enum JobError {
    /// Referenced job or record does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Operation not valid for the job's current status
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed request data (empty upload, blank course name)
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Background task could not be joined
    #[error("Internal error: {0}")]
    Internal(String),

    /// mcqforge-common error
    #[error("Common error: {0}")]
    Common(#[from] mcqforge_common::Error),
}

impl JobError {
    /// Stable machine-readable code for transport mapping
    pub fn code(&self) -> &'static str {
        match self {
            JobError::NotFound(_) => "NOT_FOUND",
            JobError::InvalidState(_) => "INVALID_STATE",
            JobError::InvalidInput(_) => "BAD_REQUEST",
            JobError::Internal(_) => "INTERNAL_ERROR",
            JobError::Common(mcqforge_common::Error::Config(_)) => "CONFIG_ERROR",
            JobError::Common(_) => "COMMON_ERROR",
        }
    }

    pub(crate) fn job_not_found(job_id: uuid::Uuid) -> Self {
        JobError::NotFound(format!("job not found: {}", job_id))
    }
}

/// Result type for job operations
pub type JobResult<T> = Result<T, JobError>;
