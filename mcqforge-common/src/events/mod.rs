//! Event types for the mcqforge event system
//!
//! Provides shared event definitions and the EventBus used to observe job
//! progress from outside the pipeline task.

mod job_types;

pub use job_types::ValidationCounts;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// mcqforge event types
///
/// Events are broadcast via EventBus and can be serialized for transmission
/// by a transport collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum McqEvent {
    /// Job record created in QUEUED state
    JobCreated {
        job_id: Uuid,
        course_name: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Source attached to a job
    SourceAttached {
        job_id: Uuid,
        source_id: Uuid,
        filename: String,
        kind: String,
        /// False when the upload could not be decoded as text
        decoded: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Job accepted for execution (start or restart)
    ///
    /// Triggers:
    /// - Supervisor: begin watching for JobCompleted / JobFailed
    JobStarted {
        job_id: Uuid,
        source_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Job moved to a new pipeline stage
    JobStageChanged {
        job_id: Uuid,
        old_state: String,
        new_state: String,
        /// Advisory progress percentage (0-100)
        progress: u8,
        current_step: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Job reached DONE
    JobCompleted {
        job_id: Uuid,
        chunk_count: usize,
        validation: ValidationCounts,
        duration_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Job reached FAILED
    JobFailed {
        job_id: Uuid,
        /// Stage during which the error was raised
        stage: String,
        error_message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl McqEvent {
    /// Job this event belongs to
    pub fn job_id(&self) -> Uuid {
        match self {
            McqEvent::JobCreated { job_id, .. }
            | McqEvent::SourceAttached { job_id, .. }
            | McqEvent::JobStarted { job_id, .. }
            | McqEvent::JobStageChanged { job_id, .. }
            | McqEvent::JobCompleted { job_id, .. }
            | McqEvent::JobFailed { job_id, .. } => *job_id,
        }
    }

    /// True for JobCompleted and JobFailed
    pub fn is_terminal(&self) -> bool {
        matches!(self, McqEvent::JobCompleted { .. } | McqEvent::JobFailed { .. })
    }
}

/// Central event distribution bus
///
/// Cloning is cheap; all clones share the same underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<McqEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    ///
    /// # Examples
    ///
    /// ```
    /// use mcqforge_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<McqEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: McqEvent) -> Result<usize, broadcast::error::SendError<McqEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: McqEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
