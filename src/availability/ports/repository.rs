//! Repository port for availability rows.

use crate::availability::domain::{MaterializationReport, TaskSpan, UserAvailability};
use crate::task::domain::{DateRange, TaskId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for availability repository operations.
pub type AvailabilityResult<T> = Result<T, AvailabilityRepositoryError>;

/// Availability persistence contract.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Regenerates every row of `span.task_id` as one atomic unit.
    ///
    /// Implementations must, within a single transaction:
    /// 1. delete all rows owned by the task,
    /// 2. collect the days in `span.range` already held by *other* tasks of
    ///    `span.user_id`,
    /// 3. plan with [`crate::availability::domain::AvailabilityPlan::build`],
    /// 4. bulk-insert the claimed days, skipping the insert when none remain.
    ///
    /// # Errors
    ///
    /// Returns [`AvailabilityRepositoryError::ConcurrentClaim`] when a
    /// concurrent regeneration claimed one of the days first.
    async fn regenerate(
        &self,
        span: &TaskSpan,
        materialized_at: DateTime<Utc>,
    ) -> AvailabilityResult<MaterializationReport>;

    /// Deletes every row owned by the task, returning how many were removed.
    async fn remove_for_task(&self, task_id: TaskId) -> AvailabilityResult<usize>;

    /// Returns the rows owned by the task, ordered by date.
    async fn find_for_task(&self, task_id: TaskId) -> AvailabilityResult<Vec<UserAvailability>>;

    /// Returns the user's rows dated inside `window`, ordered by date.
    async fn find_for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> AvailabilityResult<Vec<UserAvailability>>;
}

/// Errors returned by availability repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AvailabilityRepositoryError {
    /// Another regeneration inserted a row for the same user and day first.
    #[error("availability for user {0} was claimed concurrently")]
    ConcurrentClaim(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AvailabilityRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for AvailabilityRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
