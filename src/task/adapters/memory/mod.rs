//! In-memory adapters for task ports.

mod directory;
mod task;

pub use directory::{InMemoryTaskStatusRepository, InMemoryUserDirectory};
pub use task::InMemoryTaskRepository;
