//! mcqforge-gen library interface
//!
//! Turns course text into validated multiple-choice flashcards:
//! topic segmentation, chunk packing, heuristic card synthesis and quality
//! validation, driven by an asynchronous job state machine.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{JobError, JobResult};
pub use crate::services::{JobHandle, JobService};
