//! Diesel row models for tasks, statuses and users.

use super::schema::{task_statuses, tasks, users};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// First occupied day.
    pub start_date: NaiveDate,
    /// Last occupied day.
    pub end_date: NaiveDate,
    /// Assigned user.
    pub user_id: uuid::Uuid,
    /// Status reference.
    pub status_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// First occupied day.
    pub start_date: NaiveDate,
    /// Last occupied day.
    pub end_date: NaiveDate,
    /// Assigned user.
    pub user_id: uuid::Uuid,
    /// Status reference.
    pub status_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row for the status catalogue, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskStatusRow {
    /// Status identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Hex colour code.
    pub color: String,
}

/// Row for user accounts, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account role.
    pub role: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
