//! `PostgreSQL` connection pool and embedded schema migrations.

use crate::task::adapters::postgres::TaskPgPool;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// Ordered schema migrations as `(name, up.sql)` pairs.
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "2026-10-01-000000_create_scheduling_tables",
        include_str!("../migrations/2026-10-01-000000_create_scheduling_tables/up.sql"),
    ),
    (
        "2026-10-01-000001_add_availability_table",
        include_str!("../migrations/2026-10-01-000001_add_availability_table/up.sql"),
    ),
];

/// Builds a connection pool for `database_url` holding at most `max_size`
/// connections.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot open its first connection.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<TaskPgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size.max(1)).build(manager)
}

/// Applies every migration in order.
///
/// Migrations are written to be re-runnable, so applying them to an
/// up-to-date database is a no-op.
///
/// # Errors
///
/// Returns the Diesel error of the first migration that fails.
pub fn apply_migrations(connection: &mut PgConnection) -> Result<(), diesel::result::Error> {
    for (name, sql) in MIGRATIONS {
        connection.batch_execute(sql)?;
        tracing::info!(migration = name, "migration applied");
    }
    Ok(())
}
