//! `PostgreSQL` adapter for availability rows.

mod models;
mod repository;
mod schema;

pub use repository::PostgresAvailabilityRepository;
