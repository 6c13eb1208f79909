//! Application services for availability.

mod lookup;
mod materializer;
mod worker;

pub use lookup::{AvailabilityLookupError, AvailabilityLookupService};
pub use materializer::{AvailabilityMaterializer, MaterializeError};
pub use worker::{
    InlineMaterializationQueue, MaterializationWorker, RetryPolicy, materialize_with_retry,
};
