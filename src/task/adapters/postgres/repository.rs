//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        DateRange, PersistedTaskData, Task, TaskId, TaskStatusId, TaskTitle, UserId,
    },
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type shared by the scheduling adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Exclusion constraint preventing overlapping schedules for one user.
const SCHEDULE_EXCLUSION_CONSTRAINT: &str = "tasks_user_schedule_excl";

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let user_id = task.user_id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(_, ref info)
                        if is_schedule_exclusion(info.as_ref()) =>
                    {
                        TaskRepositoryError::OverlappingSchedule(user_id)
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let user_id = task.user_id();
        let row = to_new_row(task);

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(_, ref info)
                        if is_schedule_exclusion(info.as_ref()) =>
                    {
                        TaskRepositoryError::OverlappingSchedule(user_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;

            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_for_user_between(
        &self,
        user_id: UserId,
        window: DateRange,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(user_id.into_inner()))
                .filter(tasks::start_date.le(window.end()))
                .filter(tasks::end_date.ge(window.start()))
                .order(tasks::start_date.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list(&self, query: &TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let owned_query = query.clone();
        let offset = saturating_bound(query.offset);
        let limit = saturating_bound(query.limit);

        self.run_blocking(move |connection| {
            let matching = filtered(&owned_query)
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let rows = filtered(&owned_query)
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .offset(offset)
                .limit(limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let tasks = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            let total = usize::try_from(matching).map_err(TaskRepositoryError::persistence)?;
            Ok(TaskPage { tasks, total })
        })
        .await
    }
}

/// Builds the filtered task selection shared by the count and page queries.
fn filtered(query: &TaskQuery) -> tasks::BoxedQuery<'static, Pg> {
    let mut statement = tasks::table.into_boxed();
    if let Some(user_id) = query.user_id {
        statement = statement.filter(tasks::user_id.eq(user_id.into_inner()));
    }
    if let Some(status_id) = query.status_id {
        statement = statement.filter(tasks::status_id.eq(status_id.into_inner()));
    }
    if let Some(search) = query.search.as_deref() {
        let pattern = format!("%{}%", escape_like(search));
        statement = statement.filter(
            tasks::title
                .ilike(pattern.clone())
                .or(tasks::description.ilike(pattern)),
        );
    }
    statement
}

/// Page bounds past `i64::MAX` select nothing either way.
fn saturating_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_new_row(task: &Task) -> NewTaskRow {
    let schedule = task.schedule();
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        start_date: schedule.start(),
        end_date: schedule.end(),
        user_id: task.user_id().into_inner(),
        status_id: task.status_id().into_inner(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: raw_title,
        description,
        start_date,
        end_date,
        user_id,
        status_id,
        created_at,
        updated_at,
    } = row;

    let title = TaskTitle::new(raw_title).map_err(TaskRepositoryError::persistence)?;
    let schedule = DateRange::new(start_date, end_date).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        schedule,
        user_id: UserId::from_uuid(user_id),
        status_id: TaskStatusId::from_uuid(status_id),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn is_schedule_exclusion(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == SCHEDULE_EXCLUSION_CONSTRAINT)
}
