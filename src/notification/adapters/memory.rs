//! Recording notifier for tests and dry runs.

use crate::notification::{
    domain::AssignmentNotification,
    ports::{AssignmentNotifier, NotifierError},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Keeps every published notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<AssignmentNotification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<AssignmentNotification> {
        self.sent
            .read()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AssignmentNotifier for RecordingNotifier {
    async fn notify(&self, notification: &AssignmentNotification) -> Result<(), NotifierError> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| NotifierError::transport(std::io::Error::other(err.to_string())))?;
        sent.push(notification.clone());
        Ok(())
    }
}
