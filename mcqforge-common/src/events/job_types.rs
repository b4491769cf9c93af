//! Job workflow type definitions
//!
//! Supporting types carried by job events.

use serde::{Deserialize, Serialize};

/// Validation tallies reported when a job completes
///
/// `total == passed + failed` for every value produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationCounts {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}
