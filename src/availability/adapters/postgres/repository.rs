//! `PostgreSQL` repository implementation for availability rows.

use super::{models::AvailabilityRow, schema::user_availabilities};
use crate::availability::{
    domain::{
        AvailabilityId, AvailabilityPlan, MaterializationReport, TaskSpan, UserAvailability,
    },
    ports::{AvailabilityRepository, AvailabilityRepositoryError, AvailabilityResult},
};
use crate::task::adapters::postgres::TaskPgPool;
use crate::task::domain::{DateRange, TaskId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

/// Unique index guaranteeing one row per user and day.
const USER_DATE_UNIQUE_INDEX: &str = "idx_user_availabilities_user_date";

/// `PostgreSQL`-backed availability repository.
#[derive(Debug, Clone)]
pub struct PostgresAvailabilityRepository {
    pool: TaskPgPool,
}

impl PostgresAvailabilityRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AvailabilityResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AvailabilityResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AvailabilityRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AvailabilityRepositoryError::persistence)?
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepository {
    async fn regenerate(
        &self,
        span: &TaskSpan,
        materialized_at: DateTime<Utc>,
    ) -> AvailabilityResult<MaterializationReport> {
        let target = *span;
        self.run_blocking(move |connection| {
            connection.transaction::<_, AvailabilityRepositoryError, _>(|tx_conn| {
                delete_task_rows(tx_conn, target.task_id)?;
                let foreign_claims = load_foreign_claims(tx_conn, &target)?;
                let plan = AvailabilityPlan::build(&target, &foreign_claims);
                if !plan.is_empty() {
                    insert_rows(tx_conn, &plan, &target, materialized_at)?;
                }
                Ok(plan.into_report(&target))
            })
        })
        .await
    }

    async fn remove_for_task(&self, task_id: TaskId) -> AvailabilityResult<usize> {
        self.run_blocking(move |connection| delete_task_rows(connection, task_id))
            .await
    }

    async fn find_for_task(&self, task_id: TaskId) -> AvailabilityResult<Vec<UserAvailability>> {
        self.run_blocking(move |connection| {
            let rows = user_availabilities::table
                .filter(user_availabilities::task_id.eq(task_id.into_inner()))
                .order(user_availabilities::date.asc())
                .select(AvailabilityRow::as_select())
                .load::<AvailabilityRow>(connection)?;
            Ok(rows.into_iter().map(row_to_availability).collect())
        })
        .await
    }

    async fn find_for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> AvailabilityResult<Vec<UserAvailability>> {
        self.run_blocking(move |connection| {
            let rows = user_availabilities::table
                .filter(user_availabilities::user_id.eq(user_id.into_inner()))
                .filter(user_availabilities::date.between(window.start(), window.end()))
                .order(user_availabilities::date.asc())
                .select(AvailabilityRow::as_select())
                .load::<AvailabilityRow>(connection)?;
            Ok(rows.into_iter().map(row_to_availability).collect())
        })
        .await
    }
}

fn delete_task_rows(connection: &mut PgConnection, task_id: TaskId) -> AvailabilityResult<usize> {
    let removed = diesel::delete(
        user_availabilities::table.filter(user_availabilities::task_id.eq(task_id.into_inner())),
    )
    .execute(connection)?;
    Ok(removed)
}

/// Days in the span already held by other tasks of the same user.
fn load_foreign_claims(
    connection: &mut PgConnection,
    span: &TaskSpan,
) -> AvailabilityResult<BTreeSet<NaiveDate>> {
    let days = user_availabilities::table
        .filter(user_availabilities::user_id.eq(span.user_id.into_inner()))
        .filter(user_availabilities::task_id.ne(span.task_id.into_inner()))
        .filter(user_availabilities::date.between(span.range.start(), span.range.end()))
        .select(user_availabilities::date)
        .load::<NaiveDate>(connection)?;
    Ok(days.into_iter().collect())
}

fn insert_rows(
    connection: &mut PgConnection,
    plan: &AvailabilityPlan,
    span: &TaskSpan,
    materialized_at: DateTime<Utc>,
) -> AvailabilityResult<()> {
    let rows: Vec<AvailabilityRow> = plan
        .rows(span, materialized_at)
        .iter()
        .map(to_row)
        .collect();
    let user_id = span.user_id;

    diesel::insert_into(user_availabilities::table)
        .values(&rows)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if is_user_date_violation(info.as_ref()) =>
            {
                AvailabilityRepositoryError::ConcurrentClaim(user_id)
            }
            _ => AvailabilityRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn is_user_date_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == USER_DATE_UNIQUE_INDEX)
}

const fn to_row(availability: &UserAvailability) -> AvailabilityRow {
    AvailabilityRow {
        id: availability.id().into_inner(),
        user_id: availability.user_id().into_inner(),
        task_id: availability.task_id().into_inner(),
        date: availability.date(),
        created_at: availability.created_at(),
    }
}

const fn row_to_availability(row: AvailabilityRow) -> UserAvailability {
    UserAvailability::from_persisted(
        AvailabilityId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        TaskId::from_uuid(row.task_id),
        row.date,
        row.created_at,
    )
}
