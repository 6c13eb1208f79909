//! Assignment notifications.
//!
//! When a task is assigned, or moved to a different user, the assignee is
//! told over a private per-user channel. This module shapes the payload and
//! defines the transport seam; delivery itself belongs to adapters.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
