//! Per-day availability derived from task assignments.
//!
//! Every task occupies its assignee for each calendar day of its schedule.
//! This module materialises those days as availability rows, regenerating
//! them wholesale whenever a task is written, and exposes them for lookup.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Materialisation, lookup and background worker in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
