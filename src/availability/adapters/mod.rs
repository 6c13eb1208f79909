//! Adapter implementations for availability ports.

pub mod memory;
pub mod postgres;
