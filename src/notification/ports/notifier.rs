//! Transport seam for assignment notifications.

use crate::notification::domain::AssignmentNotification;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Delivers assignment notifications to per-user channel subscribers.
#[async_trait]
pub trait AssignmentNotifier: Send + Sync {
    /// Publishes the notification on its channel.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the transport rejects the message.
    async fn notify(&self, notification: &AssignmentNotification) -> Result<(), NotifierError>;
}

/// Errors returned by notification transports.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The payload could not be encoded.
    #[error("failed to encode notification: {0}")]
    Encoding(String),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotifierError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
