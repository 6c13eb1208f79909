//! Task aggregate root.

use super::{DateRange, TaskDomainError, TaskId, TaskStatusId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a task title, matching the `VARCHAR(255)` column.
const MAX_TITLE_LENGTH: usize = 255;

/// Validated, trimmed task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is empty after
    /// trimming, or [`TaskDomainError::TitleTooLong`] when it exceeds 255
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let length = normalized.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(TaskDomainError::TitleTooLong(length));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated field set for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Days the assignee is occupied.
    pub schedule: DateRange,
    /// Assigned user.
    pub user_id: UserId,
    /// Current status.
    pub status_id: TaskStatusId,
}

/// Replacement field set applied by [`Task::revise`].
pub type TaskChanges = NewTask;

/// Summary of what a revision changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskRevision {
    /// The assignee differs from the previous one.
    pub user_changed: bool,
    /// Either bound of the schedule moved.
    pub schedule_changed: bool,
}

impl TaskRevision {
    /// Returns `true` when the revision could introduce a new overlap.
    #[must_use]
    pub const fn affects_occupancy(self) -> bool {
        self.user_changed || self.schedule_changed
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    schedule: DateRange,
    user_id: UserId,
    status_id: TaskStatusId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted schedule.
    pub schedule: DateRange,
    /// Persisted assignee.
    pub user_id: UserId,
    /// Persisted status reference.
    pub status_id: TaskStatusId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task stamped with the current clock time.
    #[must_use]
    pub fn new(fields: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let NewTask {
            title,
            description,
            schedule,
            user_id,
            status_id,
        } = fields;

        Self {
            id: TaskId::new(),
            title,
            description: normalize_description(description),
            schedule,
            user_id,
            status_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            schedule: data.schedule,
            user_id: data.user_id,
            status_id: data.status_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the inclusive schedule.
    #[must_use]
    pub const fn schedule(&self) -> DateRange {
        self.schedule
    }

    /// Returns the assigned user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the status reference.
    #[must_use]
    pub const fn status_id(&self) -> TaskStatusId {
        self.status_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reports what applying `changes` would move, without applying them.
    #[must_use]
    pub fn revision_for(&self, changes: &TaskChanges) -> TaskRevision {
        self.revision_for_parts(changes.user_id, changes.schedule)
    }

    fn revision_for_parts(&self, user_id: UserId, schedule: DateRange) -> TaskRevision {
        TaskRevision {
            user_changed: self.user_id != user_id,
            schedule_changed: self.schedule != schedule,
        }
    }

    /// Replaces every editable field and reports what moved.
    pub fn revise(&mut self, changes: TaskChanges, clock: &impl Clock) -> TaskRevision {
        let TaskChanges {
            title,
            description,
            schedule,
            user_id,
            status_id,
        } = changes;

        let revision = self.revision_for_parts(user_id, schedule);

        self.title = title;
        self.description = normalize_description(description);
        self.schedule = schedule;
        self.user_id = user_id;
        self.status_id = status_id;
        self.updated_at = clock.utc();
        revision
    }
}

/// Blank descriptions are stored as absent.
fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|text| !text.trim().is_empty())
}
