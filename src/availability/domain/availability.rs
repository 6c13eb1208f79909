//! Availability row: one occupied day for one user and task.

use crate::task::domain::{TaskId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an availability row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityId(Uuid);

impl AvailabilityId {
    /// Creates a new random availability identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an availability identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for AvailabilityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AvailabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single calendar day on which `user_id` is occupied by `task_id`.
///
/// Rows are owned by their task: they are regenerated whenever the task is
/// written and removed with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAvailability {
    id: AvailabilityId,
    user_id: UserId,
    task_id: TaskId,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl UserAvailability {
    /// Creates a new availability row.
    #[must_use]
    pub fn new(
        user_id: UserId,
        task_id: TaskId,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::from_persisted(AvailabilityId::new(), user_id, task_id, date, created_at)
    }

    /// Reconstructs a row from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: AvailabilityId,
        user_id: UserId,
        task_id: TaskId,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            task_id,
            date,
            created_at,
        }
    }

    /// Returns the row identifier.
    #[must_use]
    pub const fn id(&self) -> AvailabilityId {
        self.id
    }

    /// Returns the occupied user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the occupied day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns when the row was materialised.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
