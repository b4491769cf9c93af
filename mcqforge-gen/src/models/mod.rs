//! Data models for mcqforge-gen

pub mod card;
pub mod chunk;
pub mod job;
pub mod source;
pub mod validation;

pub use card::{Card, CardError, MIN_OPTIONS};
pub use chunk::{estimate_tokens, Chunk, ChunkError};
pub use job::{Job, JobFailure, JobStage, JobStatus, OutputKind, StateTransition};
pub use source::{Source, SourceContent, SourceKind};
pub use validation::{RejectionReason, ValidationIssue, ValidationOutcome, ValidationSummary};
