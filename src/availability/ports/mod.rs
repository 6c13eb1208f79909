//! Port contracts for availability materialisation.

pub mod queue;
pub mod repository;

pub use queue::{MaterializationQueue, QueueError};
pub use repository::{AvailabilityRepository, AvailabilityRepositoryError, AvailabilityResult};
