//! Taskboard: task assignment with per-day availability.
//!
//! Administrators assign tasks to users over inclusive date ranges. A user
//! may never hold two tasks on the same day; every assignment is expanded
//! into one availability row per occupied day, and assignees are notified on
//! their private channel.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`task`]: Tasks, overlap checking and the assignment write path
//! - [`availability`]: Availability materialisation, lookup and the
//!   background worker
//! - [`notification`]: Assignment notification payloads and transports
//! - [`config`]: Layered operator configuration
//! - [`postgres`]: Connection pool and embedded migrations
//! - [`telemetry`]: Log subscriber setup

pub mod availability;
pub mod config;
pub mod notification;
pub mod postgres;
pub mod task;
pub mod telemetry;

#[cfg(test)]
mod test_support;
