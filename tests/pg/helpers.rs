//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use pg_embedded_setup_unpriv::TestCluster;
use pg_embedded_setup_unpriv::test_support::shared_test_cluster;
use rstest::fixture;
use taskboard::postgres::apply_migrations;
use taskboard::task::{
    adapters::postgres::{
        PostgresTaskRepository, PostgresTaskStatusRepository, PostgresUserDirectory, TaskPgPool,
    },
    domain::{
        ActorRole, DateRange, EmailAddress, NewTask, Task, TaskStatus, TaskTitle, UserAccount,
    },
    ports::{TaskStatusRepository, UserDirectory},
};
use tokio::runtime::Runtime;
use uuid::Uuid;

use crate::test_helpers::FixedClock;

/// Boxed error type for test fixtures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Creates a tokio runtime for async operations in tests.
pub fn test_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create test runtime")
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            apply_migrations(&mut conn).map_err(|e| eyre::eyre!("{e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Drops the per-test database once everything holding a connection is gone.
pub struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if let Err(e) = self.cluster.drop_database(self.db_name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {e}", self.db_name);
        }
    }
}

/// Database cloned from the template, with repositories over one pool.
///
/// The guard is declared last so the pool closes before the drop runs.
pub struct PgContext {
    pub pool: TaskPgPool,
    pub tasks: PostgresTaskRepository,
    pub statuses: PostgresTaskStatusRepository,
    pub users: PostgresUserDirectory,
    pub url: String,
    _guard: CleanupGuard,
}

impl PgContext {
    /// Stores the default status catalogue and returns it.
    pub async fn catalogue(&self) -> Result<Vec<TaskStatus>, BoxError> {
        let catalogue = TaskStatus::default_catalogue()?;
        for status in &catalogue {
            self.statuses.store(status).await?;
        }
        Ok(catalogue)
    }

    /// Stores a member account.
    pub async fn member(&self, name: &str) -> Result<UserAccount, BoxError> {
        let email = EmailAddress::new(format!("{}@example.com", name.to_ascii_lowercase()))?;
        let user = UserAccount::new(name, email, ActorRole::Member)?;
        self.users.store(&user).await?;
        Ok(user)
    }
}

/// Creates a fresh database from the migrated template on the shared
/// embedded cluster.
///
/// # Errors
///
/// Returns an error if template setup, database creation or pool
/// construction fails.
#[fixture]
pub fn context(shared_test_cluster: &'static TestCluster) -> Result<PgContext, BoxError> {
    ensure_template(shared_test_cluster)?;
    let db_name = format!("test_{}", Uuid::new_v4().simple());
    shared_test_cluster
        .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let guard = CleanupGuard {
        cluster: shared_test_cluster,
        db_name: db_name.clone(),
    };

    let url = shared_test_cluster.connection().database_url(&db_name);
    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(url.clone()))?;

    Ok(PgContext {
        tasks: PostgresTaskRepository::new(pool.clone()),
        statuses: PostgresTaskStatusRepository::new(pool.clone()),
        users: PostgresUserDirectory::new(pool.clone()),
        pool,
        url,
        _guard: guard,
    })
}

/// Builds an unsaved task for `user`.
pub fn task_for(user: &UserAccount, status: &TaskStatus, title: &str, schedule: DateRange) -> Task {
    Task::new(
        NewTask {
            title: TaskTitle::new(title).expect("valid title"),
            description: None,
            schedule,
            user_id: user.id(),
            status_id: status.id(),
        },
        &clock(),
    )
}

/// Clock used for rows written by these tests.
pub fn clock() -> FixedClock {
    FixedClock::at(2024, 1, 1)
}
