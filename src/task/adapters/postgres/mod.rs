//! `PostgreSQL` adapters for tasks, statuses and users.

mod directory;
mod models;
mod repository;
mod schema;

pub use directory::{PostgresTaskStatusRepository, PostgresUserDirectory};
pub use repository::{PostgresTaskRepository, TaskPgPool};
