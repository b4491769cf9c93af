//! Token-bounded unit of same-topic text

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Characters per estimated token
const CHARS_PER_TOKEN: usize = 4;

/// Deterministic proxy for language-model token count
///
/// `max(1, floor(chars / 4))`, counted in Unicode scalar values.
pub fn estimate_tokens(text: &str) -> usize {
    estimate_tokens_for_len(text.chars().count())
}

/// Token estimate for a text of `char_count` characters
pub fn estimate_tokens_for_len(char_count: usize) -> usize {
    (char_count / CHARS_PER_TOKEN).max(1)
}

/// Chunk construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk text must not be empty (topic: {0})")]
    EmptyText(String),
}

/// Immutable chunk; `token_estimate` always equals `estimate_tokens(text)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    chunk_id: Uuid,
    topic: String,
    token_estimate: usize,
    text: String,
}

impl Chunk {
    /// Create a chunk with a fresh identity
    pub fn new(topic: impl Into<String>, text: impl Into<String>) -> Result<Self, ChunkError> {
        let topic = topic.into();
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ChunkError::EmptyText(topic));
        }
        Ok(Self {
            chunk_id: Uuid::new_v4(),
            token_estimate: estimate_tokens(&text),
            topic,
            text,
        })
    }

    pub fn chunk_id(&self) -> Uuid {
        self.chunk_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn token_estimate(&self) -> usize {
        self.token_estimate
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
