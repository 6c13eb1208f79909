//! Notification transport adapters.

pub mod broadcast;
pub mod memory;
pub mod tracing_log;

pub use broadcast::{BroadcastNotifier, ChannelSubscription};
pub use memory::RecordingNotifier;
pub use tracing_log::TracingNotifier;
