//! Repository port for task persistence, lookup and listing.

use crate::task::domain::{DateRange, Task, TaskId, TaskStatusId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter and paging parameters for [`TaskRepository::list`].
///
/// All filters are conjunctive; `None` disables a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskQuery {
    /// Restrict to tasks assigned to this user.
    pub user_id: Option<UserId>,
    /// Restrict to tasks with this status.
    pub status_id: Option<TaskStatusId>,
    /// Case-insensitive substring matched against title or description.
    pub search: Option<String>,
    /// Number of tasks to skip.
    pub offset: usize,
    /// Maximum number of tasks to return.
    pub limit: usize,
}

/// One page of tasks, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPage {
    /// Tasks on this page.
    pub tasks: Vec<Task>,
    /// Number of tasks matching the filters across all pages.
    pub total: usize,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists, or [`TaskRepositoryError::OverlappingSchedule`] when the store
    /// enforces non-overlap itself and the task collides with another.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist,
    /// or [`TaskRepositoryError::OverlappingSchedule`] as for
    /// [`TaskRepository::store`].
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the user's tasks whose schedule touches `window`.
    ///
    /// Implementations may return extra candidates; callers apply the exact
    /// overlap predicate themselves.
    async fn find_for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists tasks matching `query`, newest first.
    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The storage-level non-overlap guarantee rejected the write.
    #[error("user {0} already has a task during the selected period")]
    OverlappingSchedule(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
