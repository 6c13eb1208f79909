//! In-process fan-out over a tokio broadcast channel.

use crate::notification::{
    domain::{AssignmentNotification, PrivateChannel},
    ports::{AssignmentNotifier, NotifierError},
};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Default number of notifications buffered per subscriber.
const DEFAULT_CAPACITY: usize = 256;

/// Publishes notifications to every live subscription of their channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<AssignmentNotification>,
}

impl BroadcastNotifier {
    /// Creates a notifier buffering up to `capacity` notifications per
    /// subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Opens a subscription that only yields notifications for `channel`.
    #[must_use]
    pub fn subscribe(&self, channel: PrivateChannel) -> ChannelSubscription {
        ChannelSubscription {
            channel,
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl AssignmentNotifier for BroadcastNotifier {
    async fn notify(&self, notification: &AssignmentNotification) -> Result<(), NotifierError> {
        // No subscribers is not a delivery failure.
        if self.sender.send(notification.clone()).is_err() {
            tracing::debug!(
                channel = %notification.channel(),
                "no subscribers for assignment notification"
            );
        }
        Ok(())
    }
}

/// Receiving end bound to one private channel.
#[derive(Debug)]
pub struct ChannelSubscription {
    channel: PrivateChannel,
    receiver: broadcast::Receiver<AssignmentNotification>,
}

impl ChannelSubscription {
    /// Returns the subscribed channel.
    #[must_use]
    pub const fn channel(&self) -> PrivateChannel {
        self.channel
    }

    /// Waits for the next notification on this channel.
    ///
    /// Returns `None` once every notifier handle has been dropped.
    pub async fn recv(&mut self) -> Option<AssignmentNotification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) if notification.channel() == self.channel => {
                    return Some(notification);
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(channel = %self.channel, missed, "subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
