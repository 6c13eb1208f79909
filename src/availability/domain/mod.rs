//! Domain model for user availability.

mod availability;
mod plan;

pub use availability::{AvailabilityId, UserAvailability};
pub use plan::{AvailabilityPlan, MaterializationReport, TaskSpan};
