//! Overlap detection between a candidate schedule and a user's tasks.

use crate::task::{
    domain::{DateRange, Task, TaskId, UserId},
    ports::{TaskRepository, TaskRepositoryResult},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// When an update re-runs the overlap check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapCheckPolicy {
    /// Only when the assignee or either date changed.
    #[default]
    OnChange,
    /// On every update.
    Always,
}

impl OverlapCheckPolicy {
    /// Returns the canonical configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnChange => "on_change",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for OverlapCheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown policy spelling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown overlap check policy: {0}")]
pub struct ParseOverlapPolicyError(pub String);

impl TryFrom<&str> for OverlapCheckPolicy {
    type Error = ParseOverlapPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "on_change" => Ok(Self::OnChange),
            "always" => Ok(Self::Always),
            _ => Err(ParseOverlapPolicyError(value.to_owned())),
        }
    }
}

/// Answers whether a schedule collides with an existing task of a user.
///
/// The repository narrows candidates; the closed-interval predicate from
/// [`DateRange::overlaps`] makes the final call here.
#[derive(Clone)]
pub struct OverlapChecker<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> OverlapChecker<R>
where
    R: TaskRepository,
{
    /// Creates a checker over the given repository.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns `true` when any task of `user_id`, other than `exclude`,
    /// shares a day with `schedule`.
    ///
    /// # Errors
    ///
    /// Returns the repository error when candidate lookup fails.
    pub async fn has_overlap(
        &self,
        user_id: UserId,
        schedule: DateRange,
        exclude: Option<TaskId>,
    ) -> TaskRepositoryResult<bool> {
        Ok(self
            .find_conflict(user_id, schedule, exclude)
            .await?
            .is_some())
    }

    /// Returns the first conflicting task, if any.
    ///
    /// # Errors
    ///
    /// Returns the repository error when candidate lookup fails.
    pub async fn find_conflict(
        &self,
        user_id: UserId,
        schedule: DateRange,
        exclude: Option<TaskId>,
    ) -> TaskRepositoryResult<Option<Task>> {
        let candidates = self
            .repository
            .find_for_user_between(user_id, schedule)
            .await?;
        Ok(candidates.into_iter().find(|task| {
            task.user_id() == user_id
                && Some(task.id()) != exclude
                && task.schedule().overlaps(&schedule)
        }))
    }
}
