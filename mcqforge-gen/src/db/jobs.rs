//! In-memory job store with per-job locking
//!
//! The outer map lock is held only long enough to look up or insert a job
//! handle; every read or mutation of a job happens under that job's own mutex.

use super::JobRepository;
use crate::error::{JobError, JobResult};
use crate::models::{Chunk, Job, JobStatus, Source, StateTransition, ValidationOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, Arc<Mutex<Job>>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, job_id: Uuid) -> JobResult<Arc<Mutex<Job>>> {
        self.jobs
            .read()
            .await
            .get(&job_id)
            .cloned()
            .ok_or_else(|| JobError::job_not_found(job_id))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobStore {
    async fn insert(&self, job: Job) -> JobResult<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.job_id) {
            return Err(JobError::InvalidState(format!(
                "job already exists: {}",
                job.job_id
            )));
        }
        jobs.insert(job.job_id, Arc::new(Mutex::new(job)));
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> JobResult<Job> {
        let slot = self.slot(job_id).await?;
        let job = slot.lock().await;
        Ok(job.clone())
    }

    async fn attach_source(&self, job_id: Uuid, source: Source) -> JobResult<()> {
        let slot = self.slot(job_id).await?;
        slot.lock().await.sources.push(source);
        Ok(())
    }

    async fn claim_for_start(&self, job_id: Uuid) -> JobResult<StateTransition> {
        let slot = self.slot(job_id).await?;
        let mut job = slot.lock().await;
        job.begin_run()
    }

    async fn transition(&self, job_id: Uuid, status: JobStatus) -> JobResult<StateTransition> {
        let slot = self.slot(job_id).await?;
        let mut job = slot.lock().await;
        job.transition_to(status)
    }

    async fn store_chunks(&self, job_id: Uuid, chunks: Vec<Chunk>) -> JobResult<()> {
        let slot = self.slot(job_id).await?;
        slot.lock().await.chunks = chunks;
        Ok(())
    }

    async fn store_outcome(&self, job_id: Uuid, outcome: ValidationOutcome) -> JobResult<()> {
        let slot = self.slot(job_id).await?;
        slot.lock().await.record_outcome(outcome);
        Ok(())
    }
}
