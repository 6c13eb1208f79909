//! Port for deferring availability materialisation.

use crate::task::domain::TaskId;
use async_trait::async_trait;
use thiserror::Error;

/// Accepts tasks whose availability must be regenerated.
///
/// Callers enqueue only after the task write has committed. Delivery is
/// at-least-once, so consumers must tolerate duplicates.
#[async_trait]
pub trait MaterializationQueue: Send + Sync {
    /// Schedules regeneration for the task.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError`] when the job cannot be accepted.
    async fn enqueue(&self, task_id: TaskId) -> Result<(), QueueError>;
}

/// Errors returned when a job cannot be queued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The consuming worker has shut down.
    #[error("materialization queue is closed")]
    Closed,

    /// Inline execution failed; the job was not retried.
    #[error("materialization failed: {0}")]
    Failed(String),
}
