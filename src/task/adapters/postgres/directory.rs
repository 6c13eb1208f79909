//! `PostgreSQL` adapters for the status catalogue and user directory.

use super::{
    models::{TaskStatusRow, UserRow},
    repository::TaskPgPool,
    schema::{task_statuses, users},
};
use crate::task::{
    domain::{
        ActorRole, EmailAddress, StatusColor, StatusName, TaskStatus, TaskStatusId, UserAccount,
        UserId,
    },
    ports::{DirectoryError, DirectoryResult, TaskStatusRepository, UserDirectory},
};
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

async fn run_blocking<F, T>(pool: &TaskPgPool, f: F) -> DirectoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> DirectoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(DirectoryError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(DirectoryError::persistence)?
}

fn map_insert_error(err: DieselError, label: String) -> DirectoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DirectoryError::Duplicate(label)
        }
        other => DirectoryError::persistence(other),
    }
}

/// `PostgreSQL`-backed status catalogue.
#[derive(Debug, Clone)]
pub struct PostgresTaskStatusRepository {
    pool: TaskPgPool,
}

impl PostgresTaskStatusRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStatusRepository for PostgresTaskStatusRepository {
    async fn store(&self, status: &TaskStatus) -> DirectoryResult<()> {
        let row = TaskStatusRow {
            id: status.id().into_inner(),
            name: status.name().as_str().to_owned(),
            color: status.color().as_str().to_owned(),
        };
        let label = format!("task status '{}'", status.name());

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(task_statuses::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, label))?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskStatusId) -> DirectoryResult<Option<TaskStatus>> {
        run_blocking(&self.pool, move |connection| {
            let row = task_statuses::table
                .find(id.into_inner())
                .select(TaskStatusRow::as_select())
                .first::<TaskStatusRow>(connection)
                .optional()
                .map_err(DirectoryError::persistence)?;
            row.map(row_to_status).transpose()
        })
        .await
    }

    async fn list(&self) -> DirectoryResult<Vec<TaskStatus>> {
        run_blocking(&self.pool, move |connection| {
            let rows = task_statuses::table
                .order(task_statuses::name.asc())
                .select(TaskStatusRow::as_select())
                .load::<TaskStatusRow>(connection)
                .map_err(DirectoryError::persistence)?;
            rows.into_iter().map(row_to_status).collect()
        })
        .await
    }
}

fn row_to_status(row: TaskStatusRow) -> DirectoryResult<TaskStatus> {
    let name = StatusName::new(row.name).map_err(DirectoryError::persistence)?;
    let color = StatusColor::new(row.color).map_err(DirectoryError::persistence)?;
    Ok(TaskStatus::with_id(TaskStatusId::from_uuid(row.id), name, color))
}

/// `PostgreSQL`-backed user directory.
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: TaskPgPool,
}

impl PostgresUserDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn store(&self, user: &UserAccount) -> DirectoryResult<()> {
        let row = UserRow {
            id: user.id().into_inner(),
            name: user.name().to_owned(),
            email: user.email().as_str().to_owned(),
            role: user.role().as_str().to_owned(),
            created_at: Utc::now(),
        };
        let label = format!("user '{}'", user.email());

        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| map_insert_error(err, label))?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> DirectoryResult<Option<UserAccount>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self) -> DirectoryResult<Vec<UserAccount>> {
        run_blocking(&self.pool, move |connection| {
            let rows = users::table
                .order(users::name.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(DirectoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> DirectoryResult<UserAccount> {
    let email = EmailAddress::new(row.email).map_err(DirectoryError::persistence)?;
    let role = ActorRole::try_from(row.role.as_str()).map_err(DirectoryError::persistence)?;
    UserAccount::with_id(UserId::from_uuid(row.id), row.name, email, role)
        .map_err(DirectoryError::persistence)
}
