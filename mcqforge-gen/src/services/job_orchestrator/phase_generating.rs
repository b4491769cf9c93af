//! Stage 3: GENERATING
//!
//! One card per chunk, then validation over the whole card list.

use super::JobOrchestrator;
use crate::models::{Chunk, JobStatus, ValidationSummary};
use anyhow::{Context, Result};
use uuid::Uuid;

impl JobOrchestrator {
    pub(super) async fn phase_generating(
        &self,
        job_id: Uuid,
        chunks: &[Chunk],
    ) -> Result<ValidationSummary> {
        let transition = self.repo.transition(job_id, JobStatus::Generating).await?;
        self.broadcast_transition(&transition).await;

        tracing::info!(job_id = %job_id, chunk_count = chunks.len(), "Stage 3: GENERATING");

        let mut raw_cards = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let card = self
                .synthesizer
                .synthesize(chunk)
                .with_context(|| format!("card synthesis failed for chunk {}", chunk.chunk_id()))?;
            raw_cards.push(card);
        }

        let outcome = self.validator.validate(raw_cards);
        let summary = outcome.summary;

        tracing::info!(
            job_id = %job_id,
            total = summary.total(),
            passed = summary.passed(),
            failed = summary.failed(),
            "Cards validated"
        );

        self.repo.store_outcome(job_id, outcome).await?;
        Ok(summary)
    }
}
