//! Pure planning step of availability regeneration.
//!
//! Adapters run the plan inside their own transaction: they drop the task's
//! previous rows, read the days other tasks already claim for the same user,
//! call [`AvailabilityPlan::build`], and insert what it claims.

use super::UserAvailability;
use crate::task::domain::{DateRange, Task, TaskId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The slice of a task the materialiser needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpan {
    /// Task whose rows are regenerated.
    pub task_id: TaskId,
    /// Assignee occupied by the task.
    pub user_id: UserId,
    /// Days covered by the task.
    pub range: DateRange,
}

impl From<&Task> for TaskSpan {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            user_id: task.user_id(),
            range: task.schedule(),
        }
    }
}

/// Days to insert for a task, and days withheld because another task of the
/// same user already holds them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvailabilityPlan {
    claimed: Vec<NaiveDate>,
    skipped: Vec<NaiveDate>,
}

impl AvailabilityPlan {
    /// Plans regeneration of `span` given the days already held by other
    /// tasks of the same user.
    ///
    /// First writer wins: a day present in `foreign_claims` is skipped and the
    /// existing row is left untouched.
    #[must_use]
    pub fn build(span: &TaskSpan, foreign_claims: &BTreeSet<NaiveDate>) -> Self {
        let (skipped, claimed): (Vec<_>, Vec<_>) = span
            .range
            .days()
            .partition(|day| foreign_claims.contains(day));
        Self { claimed, skipped }
    }

    /// Returns the days to insert, ascending.
    #[must_use]
    pub fn claimed(&self) -> &[NaiveDate] {
        &self.claimed
    }

    /// Returns the days withheld due to foreign claims, ascending.
    #[must_use]
    pub fn skipped(&self) -> &[NaiveDate] {
        &self.skipped
    }

    /// Returns `true` when nothing is to be inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Builds the rows to insert for `span`.
    #[must_use]
    pub fn rows(&self, span: &TaskSpan, created_at: DateTime<Utc>) -> Vec<UserAvailability> {
        self.claimed
            .iter()
            .map(|day| UserAvailability::new(span.user_id, span.task_id, *day, created_at))
            .collect()
    }

    /// Converts the plan into the report returned to callers.
    #[must_use]
    pub fn into_report(self, span: &TaskSpan) -> MaterializationReport {
        MaterializationReport {
            task_id: span.task_id,
            user_id: span.user_id,
            inserted: self.claimed,
            skipped: self.skipped,
        }
    }
}

/// Outcome of one regeneration.
///
/// `skipped` is empty under normal operation; a non-empty list means another
/// task already held those days and the task is under-represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializationReport {
    /// Regenerated task.
    pub task_id: TaskId,
    /// Assignee the rows were written for.
    pub user_id: UserId,
    /// Days written, ascending.
    pub inserted: Vec<NaiveDate>,
    /// Days withheld, ascending.
    pub skipped: Vec<NaiveDate>,
}

impl MaterializationReport {
    /// Returns `true` when every day of the task was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
