//! Port contracts for notification delivery.

mod notifier;

pub use notifier::{AssignmentNotifier, NotifierError};
