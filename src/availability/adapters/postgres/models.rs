//! Diesel row model for availability rows.

use super::schema::user_availabilities;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Availability row, used for reads and bulk inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_availabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AvailabilityRow {
    /// Row identifier.
    pub id: uuid::Uuid,
    /// Occupied user.
    pub user_id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Occupied day.
    pub date: NaiveDate,
    /// Materialisation timestamp.
    pub created_at: DateTime<Utc>,
}
