//! Pipeline services for mcqforge-gen

pub mod card_synthesizer;
pub mod chunk_builder;
pub mod job_orchestrator;
pub mod job_service;
pub mod quality_validator;
pub mod topic_segmenter;

pub use card_synthesizer::CardSynthesizer;
pub use chunk_builder::ChunkBuilder;
pub use job_orchestrator::JobOrchestrator;
pub use job_service::{JobHandle, JobPreview, JobService, JobStatusView, ValidationReport};
pub use quality_validator::{QualityRule, QualityValidator};
pub use topic_segmenter::{TopicSections, TopicSegmenter};
