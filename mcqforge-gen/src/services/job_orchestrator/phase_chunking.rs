//! Stage 2: CHUNKING
//!
//! Topic segmentation followed by chunk packing and compaction.

use super::JobOrchestrator;
use crate::models::{Chunk, JobStatus};
use anyhow::Result;
use uuid::Uuid;

impl JobOrchestrator {
    pub(super) async fn phase_chunking(&self, job_id: Uuid, text: &str) -> Result<Vec<Chunk>> {
        let transition = self.repo.transition(job_id, JobStatus::Chunking).await?;
        self.broadcast_transition(&transition).await;

        tracing::info!(job_id = %job_id, "Stage 2: CHUNKING");

        let sections = self.segmenter.segment(text);
        let chunks = self.chunk_builder.build(&sections)?;

        tracing::info!(
            job_id = %job_id,
            topics = sections.len(),
            chunk_count = chunks.len(),
            "Chunks built"
        );

        self.repo.store_chunks(job_id, chunks.clone()).await?;
        Ok(chunks)
    }
}
