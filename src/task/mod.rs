//! Task assignment for taskboard.
//!
//! Administrators assign tasks to users over inclusive date ranges. A user
//! may hold at most one task on any given day: every create and update is
//! gated by the overlap checker before the write, and the storage layer
//! backstops the same rule. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
