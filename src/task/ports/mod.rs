//! Port contracts for task assignment.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod directory;
pub mod repository;

pub use directory::{
    DirectoryError, DirectoryResult, TaskStatusRepository, UserDirectory,
};
pub use repository::{
    TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
