//! In-memory availability store.

mod repository;

pub use repository::InMemoryAvailabilityRepository;
