//! Ports for the reference data tasks point at: statuses and users.

use crate::task::domain::{TaskStatus, TaskStatusId, UserAccount, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for reference-data lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Task status catalogue.
#[async_trait]
pub trait TaskStatusRepository: Send + Sync {
    /// Stores a new status.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Duplicate`] when a status with the same
    /// identifier or name exists.
    async fn store(&self, status: &TaskStatus) -> DirectoryResult<()>;

    /// Finds a status by identifier.
    async fn find_by_id(&self, id: TaskStatusId) -> DirectoryResult<Option<TaskStatus>>;

    /// Lists all statuses ordered by name.
    async fn list(&self) -> DirectoryResult<Vec<TaskStatus>>;
}

/// Lookup of the user accounts tasks can be assigned to.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Stores a new user account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Duplicate`] when the identifier or email is
    /// already registered.
    async fn store(&self, user: &UserAccount) -> DirectoryResult<()>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<UserAccount>>;

    /// Lists all users ordered by name.
    async fn list(&self) -> DirectoryResult<Vec<UserAccount>>;
}

/// Errors returned by reference-data adapters.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The record collides with an existing one.
    #[error("duplicate {0}")]
    Duplicate(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
