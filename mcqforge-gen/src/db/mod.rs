//! Job persistence
//!
//! The pipeline talks to storage only through [`JobRepository`]; durability
//! belongs to whichever implementation is injected.

pub mod jobs;

pub use jobs::InMemoryJobStore;

use crate::error::JobResult;
use crate::models::{Chunk, Job, JobStatus, Source, StateTransition, ValidationOutcome};
use async_trait::async_trait;
use uuid::Uuid;

/// Job record store
///
/// Implementations must serialize mutations per job. Unrelated jobs should
/// not contend on a shared lock.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Store a freshly created job
    async fn insert(&self, job: Job) -> JobResult<()>;

    /// Snapshot of a job (`NotFound` if unknown)
    async fn get(&self, job_id: Uuid) -> JobResult<Job>;

    async fn attach_source(&self, job_id: Uuid, source: Source) -> JobResult<()>;

    /// Atomically check startability and move to PARSING
    ///
    /// The check and the transition happen under one exclusive acquisition,
    /// so concurrent starts of the same job cannot both succeed.
    async fn claim_for_start(&self, job_id: Uuid) -> JobResult<StateTransition>;

    /// Apply a state-machine transition (including to FAILED)
    async fn transition(&self, job_id: Uuid, status: JobStatus) -> JobResult<StateTransition>;

    async fn store_chunks(&self, job_id: Uuid, chunks: Vec<Chunk>) -> JobResult<()>;

    async fn store_outcome(&self, job_id: Uuid, outcome: ValidationOutcome) -> JobResult<()>;
}
