//! Notifier that writes each notification to the log.

use crate::notification::{
    domain::AssignmentNotification,
    ports::{AssignmentNotifier, NotifierError},
};
use async_trait::async_trait;

/// Emits notifications as structured `info` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl AssignmentNotifier for TracingNotifier {
    async fn notify(&self, notification: &AssignmentNotification) -> Result<(), NotifierError> {
        let payload = notification
            .to_json()
            .map_err(|err| NotifierError::Encoding(err.to_string()))?;
        tracing::info!(
            channel = %notification.channel(),
            event = notification.event(),
            %payload,
            "assignment notification"
        );
        Ok(())
    }
}
