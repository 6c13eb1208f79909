//! `task.assigned` payload shaping.

use super::PrivateChannel;
use crate::task::domain::{Task, TaskId, TaskStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Event name carried alongside every assignment payload.
pub const ASSIGNMENT_EVENT: &str = "task.assigned";

/// Wire format for the date fields of the payload.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Snapshot of an assigned task as delivered to the assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPayload {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description, if any.
    pub description: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
    /// Name of the task's status when the payload was generated.
    pub status_name: String,
    /// `true` when the task moved from another user.
    pub reassigned: bool,
    /// Generation time, RFC 3339 UTC with millisecond precision.
    pub assigned_at: String,
}

/// Payload plus the channel it is delivered on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentNotification {
    channel: PrivateChannel,
    payload: AssignmentPayload,
}

impl AssignmentNotification {
    /// Shapes the notification for a persisted task and its resolved status.
    ///
    /// The channel is always the one of the task's current assignee.
    #[must_use]
    pub fn new(
        task: &Task,
        status: &TaskStatus,
        reassigned: bool,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let schedule = task.schedule();
        let payload = AssignmentPayload {
            id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(str::to_owned),
            start_date: schedule.start().format(DATE_FORMAT).to_string(),
            end_date: schedule.end().format(DATE_FORMAT).to_string(),
            status_name: status.name().as_str().to_owned(),
            reassigned,
            assigned_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        Self {
            channel: PrivateChannel::for_user(task.user_id()),
            payload,
        }
    }

    /// Returns the delivery channel.
    #[must_use]
    pub const fn channel(&self) -> PrivateChannel {
        self.channel
    }

    /// Returns the event name.
    #[must_use]
    pub const fn event(&self) -> &'static str {
        ASSIGNMENT_EVENT
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &AssignmentPayload {
        &self.payload
    }

    /// Serialises the payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(&self.payload)
    }
}
