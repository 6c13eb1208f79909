//! Notification payload and channel types.

mod assignment;
mod channel;

pub use assignment::{ASSIGNMENT_EVENT, AssignmentNotification, AssignmentPayload};
pub use channel::PrivateChannel;
