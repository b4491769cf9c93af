//! Stage 1: PARSING
//!
//! Concatenates decoded source text in attachment order.

use super::JobOrchestrator;
use crate::models::SourceContent;
use anyhow::Result;
use uuid::Uuid;

impl JobOrchestrator {
    pub(super) async fn phase_parsing(&self, job_id: Uuid) -> Result<String> {
        let job = self.repo.get(job_id).await?;

        tracing::info!(
            job_id = %job_id,
            source_count = job.sources.len(),
            "Stage 1: PARSING"
        );

        let mut parts = Vec::with_capacity(job.sources.len());
        for source in &job.sources {
            match &source.content {
                SourceContent::Decoded { text } => parts.push(text.as_str()),
                SourceContent::PendingBinary { kind, byte_len } => {
                    tracing::warn!(
                        job_id = %job_id,
                        source_id = %source.source_id,
                        filename = %source.filename,
                        kind = kind.as_str(),
                        byte_len,
                        "Skipping binary source pending decoding"
                    );
                }
            }
        }

        let text = parts.join("\n");
        tracing::debug!(job_id = %job_id, chars = text.len(), "Source text merged");
        Ok(text)
    }
}
