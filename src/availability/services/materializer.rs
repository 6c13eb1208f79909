//! Regenerates the availability rows of one committed task.

use crate::availability::{
    domain::{MaterializationReport, TaskSpan},
    ports::{AvailabilityRepository, AvailabilityRepositoryError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while materialising a task.
#[derive(Debug, Clone, Error)]
pub enum MaterializeError {
    /// The task no longer exists; there is nothing to materialise.
    #[error("task {0} no longer exists")]
    TaskMissing(TaskId),
    /// Loading the task failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Writing availability rows failed.
    #[error(transparent)]
    Availability(#[from] AvailabilityRepositoryError),
}

impl MaterializeError {
    /// Returns `true` when running the job again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::TaskMissing(_))
    }
}

/// Derives per-day availability from a task's schedule.
///
/// Running it twice for the same task yields the same rows.
#[derive(Clone)]
pub struct AvailabilityMaterializer<T, A, C>
where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    availability: Arc<A>,
    clock: Arc<C>,
}

impl<T, A, C> AvailabilityMaterializer<T, A, C>
where
    T: TaskRepository,
    A: AvailabilityRepository,
    C: Clock + Send + Sync,
{
    /// Creates a materialiser over the given stores.
    #[must_use]
    pub const fn new(tasks: Arc<T>, availability: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            availability,
            clock,
        }
    }

    /// Replaces the task's availability rows with one row per day of its
    /// schedule, leaving days held by other tasks of the same user alone.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError::TaskMissing`] when the task was deleted,
    /// or the underlying repository error.
    pub async fn materialize(
        &self,
        task_id: TaskId,
    ) -> Result<MaterializationReport, MaterializeError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(MaterializeError::TaskMissing(task_id))?;
        let span = TaskSpan::from(&task);

        let report = self.availability.regenerate(&span, self.clock.utc()).await?;
        if self.tasks.find_by_id(task_id).await?.is_none() {
            // Deleted while regenerating: the rows just written have no owner.
            let removed = self.availability.remove_for_task(task_id).await?;
            tracing::warn!(
                task_id = %task_id,
                removed,
                "task deleted during materialization; rows withdrawn"
            );
            return Err(MaterializeError::TaskMissing(task_id));
        }
        if report.is_complete() {
            tracing::info!(
                task_id = %task_id,
                user_id = %span.user_id,
                inserted = report.inserted.len(),
                "availability materialized"
            );
        } else {
            tracing::warn!(
                task_id = %task_id,
                user_id = %span.user_id,
                inserted = report.inserted.len(),
                skipped = ?report.skipped,
                "availability days already held by another task were skipped"
            );
        }
        Ok(report)
    }
}
