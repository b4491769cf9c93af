//! Token-bounded chunk construction
//!
//! Two passes:
//! 1. Per-topic packing: lines accumulate until adding the next one would
//!    push the buffer over `target_max_tokens`.
//! 2. Compaction: a chunk is folded into the immediately preceding output
//!    chunk when both share a topic and the preceding one is still below
//!    `target_min_tokens`. Single pass; nothing further back is revisited, so
//!    undersized chunks can survive (e.g. small, large, small).

use super::topic_segmenter::TopicSections;
use crate::config::ChunkingConfig;
use crate::models::chunk::estimate_tokens_for_len;
use crate::models::{Chunk, ChunkError};

#[derive(Debug, Clone)]
pub struct ChunkBuilder {
    target_min_tokens: usize,
    target_max_tokens: usize,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new(&ChunkingConfig::default())
    }
}

impl ChunkBuilder {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            target_min_tokens: config.target_min_tokens,
            target_max_tokens: config.target_max_tokens,
        }
    }

    /// Pack and compact all sections, preserving section order
    pub fn build(&self, sections: &TopicSections) -> Result<Vec<Chunk>, ChunkError> {
        let packed = self.pack(sections)?;
        let packed_count = packed.len();
        let merged = self.compact(packed)?;

        tracing::debug!(
            packed = packed_count,
            merged = merged.len(),
            "Chunk construction complete"
        );
        Ok(merged)
    }

    /// Per-topic packing pass
    pub fn pack(&self, sections: &TopicSections) -> Result<Vec<Chunk>, ChunkError> {
        let mut chunks = Vec::new();

        for section in sections.iter() {
            let mut buffer: Vec<&str> = Vec::new();
            // Character count of buffer.join("\n")
            let mut buffer_chars = 0usize;

            for line in &section.lines {
                let line_chars = line.chars().count();
                let prospective = if buffer.is_empty() {
                    line_chars
                } else {
                    buffer_chars + 1 + line_chars
                };

                if !buffer.is_empty() && estimate_tokens_for_len(prospective) > self.target_max_tokens {
                    chunks.push(Chunk::new(section.topic.as_str(), buffer.join("\n"))?);
                    buffer.clear();
                    buffer.push(line);
                    buffer_chars = line_chars;
                } else {
                    buffer.push(line);
                    buffer_chars = prospective;
                }
            }

            if !buffer.is_empty() {
                chunks.push(Chunk::new(section.topic.as_str(), buffer.join("\n"))?);
            }
        }

        Ok(chunks)
    }

    /// Single-pass merge-back compaction
    pub fn compact(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>, ChunkError> {
        let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            match merged.last_mut() {
                Some(prev)
                    if prev.topic() == chunk.topic()
                        && prev.token_estimate() < self.target_min_tokens =>
                {
                    let combined = format!("{}\n{}", prev.text(), chunk.text());
                    *prev = Chunk::new(chunk.topic(), combined.trim())?;
                }
                _ => merged.push(chunk),
            }
        }

        Ok(merged)
    }
}
