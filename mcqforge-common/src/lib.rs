//! # mcqforge common library
//!
//! Shared code for the mcqforge crates:
//! - Error types
//! - Event types (McqEvent enum) and the EventBus
//! - Bootstrap configuration loading (TOML)

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
