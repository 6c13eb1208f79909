//! Private per-user delivery channels.

use crate::task::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery scope restricted to one user's subscribers.
///
/// Channel names take the form `user.<user_id>`. Deciding who may subscribe
/// is the transport's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrivateChannel {
    user_id: UserId,
}

impl PrivateChannel {
    /// Returns the channel for the given user.
    #[must_use]
    pub const fn for_user(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the user the channel belongs to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the wire name of the channel.
    #[must_use]
    pub fn name(&self) -> String {
        format!("user.{}", self.user_id)
    }
}

impl fmt::Display for PrivateChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user.{}", self.user_id)
    }
}
