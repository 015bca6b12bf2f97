//! NotificationDispatcher processor.
//!
//! The NotificationDispatcher is responsible for:
//! - Receiving `RedeemableDelta` events from the poller
//! - Rendering the core message once per delta
//! - Framing and sending it unicast on every configured channel
//!
//! Delivery is best-effort: a channel that fails is logged and skipped,
//! the remaining channels still receive the notification, and the tickets
//! are never re-flagged as new in a later cycle.

use crate::events::DeltaReceiver;
use crate::events::types::RedeemableDelta;
use crate::notify::message::render_redeemable_message;
use crate::tickets::SubscriberId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Errors from a single channel delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP transport error
    #[error("channel request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Channel gateway refused the notification
    #[error("channel rejected notification with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Rendered payload handed to a channel sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub subject: Option<String>,
    pub body: String,
}

/// Per-channel framing around the core message.
///
/// The channel list and its framing are configuration data, not code:
/// adding a channel means adding a table entry, not a branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub name: String,
    /// Prepended to the core message body (branding prefix).
    #[serde(default)]
    pub body_prefix: Option<String>,
    /// Subject line for channels that carry one.
    #[serde(default)]
    pub subject: Option<String>,
}

impl ChannelProfile {
    /// Frame the core message for this channel.
    pub fn frame(&self, core_message: &str) -> Notification {
        let body = match &self.body_prefix {
            Some(prefix) => format!("{prefix}{core_message}"),
            None => core_message.to_owned(),
        };
        Notification {
            subject: self.subject.clone(),
            body,
        }
    }
}

/// One delivery channel: transport lives behind the trait, framing in the
/// profile.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    /// Send `notification` to exactly `subscriber` (unicast, never
    /// broadcast).
    async fn send(
        &self,
        subscriber: &SubscriberId,
        notification: &Notification,
    ) -> Result<(), DeliveryError>;
}

/// A configured channel.
pub struct Channel {
    pub profile: ChannelProfile,
    pub sender: Box<dyn ChannelSender>,
}

/// NotificationDispatcher delivers deltas over the configured channels.
pub struct NotificationDispatcher {
    channels: Vec<Channel>,
    delta_rx: DeltaReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl NotificationDispatcher {
    /// Create a new NotificationDispatcher.
    pub fn new(
        channels: Vec<Channel>,
        delta_rx: DeltaReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            channels,
            delta_rx,
            shutdown_rx,
        }
    }

    /// Run the NotificationDispatcher.
    pub async fn run(mut self) {
        info!(
            channels = self.channels.len(),
            "NotificationDispatcher started"
        );

        loop {
            tokio::select! {
                biased;

                // Check for shutdown
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("NotificationDispatcher received shutdown signal");
                        break;
                    }
                }

                Some(delta) = self.delta_rx.recv() => {
                    self.dispatch(delta).await;
                }

                else => {
                    info!("RedeemableDelta channel closed");
                    break;
                }
            }
        }

        info!("NotificationDispatcher shutdown complete");
    }

    /// Deliver one delta on every configured channel.
    ///
    /// The caller guarantees the delta is non-empty.
    async fn dispatch(&self, delta: RedeemableDelta) {
        let core_message = render_redeemable_message(&delta.tickets);
        debug!(
            subscriber = %delta.subscriber,
            tickets = delta.tickets.len(),
            "Dispatching redeemable-ticket notification"
        );

        for channel in &self.channels {
            let notification = channel.profile.frame(&core_message);
            if let Err(e) = channel.sender.send(&delta.subscriber, &notification).await {
                error!(
                    channel = %channel.profile.name,
                    subscriber = %delta.subscriber,
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::delta_channel;
    use crate::tickets::{Ticket, TicketId};
    use std::sync::{Arc, Mutex};

    fn delta(subscriber: &str, lamports: u64) -> RedeemableDelta {
        RedeemableDelta {
            subscriber: SubscriberId(subscriber.to_string()),
            tickets: vec![Ticket {
                id: TicketId("t1".to_string()),
                owner: SubscriberId(subscriber.to_string()),
                state_account: "state".to_string(),
                lamports,
                created_epoch: 10,
                is_due: Some(true),
                due_at: None,
            }],
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSender {
        sent: Arc<Mutex<Vec<(SubscriberId, Notification)>>>,
    }

    #[async_trait]
    impl ChannelSender for RecordingSender {
        async fn send(
            &self,
            subscriber: &SubscriberId,
            notification: &Notification,
        ) -> Result<(), DeliveryError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push((subscriber.clone(), notification.clone()));
            }
            Ok(())
        }
    }

    struct FailingSender;

    #[async_trait]
    impl ChannelSender for FailingSender {
        async fn send(
            &self,
            _subscriber: &SubscriberId,
            _notification: &Notification,
        ) -> Result<(), DeliveryError> {
            Err(DeliveryError::Rejected {
                status: 503,
                body: "gateway down".to_string(),
            })
        }
    }

    fn profile(name: &str, prefix: Option<&str>, subject: Option<&str>) -> ChannelProfile {
        ChannelProfile {
            name: name.to_string(),
            body_prefix: prefix.map(str::to_string),
            subject: subject.map(str::to_string),
        }
    }

    #[test]
    fn framing_applies_prefix_and_subject() {
        let framed = profile("telegram", Some("Staking: "), None).frame("core message");
        assert_eq!(framed.body, "Staking: core message");
        assert_eq!(framed.subject, None);

        let framed = profile("email", None, Some("Tickets redeemable")).frame("core message");
        assert_eq!(framed.body, "core message");
        assert_eq!(framed.subject.as_deref(), Some("Tickets redeemable"));
    }

    #[tokio::test]
    async fn failing_channel_does_not_block_the_others() {
        let recording = RecordingSender::default();
        let channels = vec![
            Channel {
                profile: profile("sms", None, None),
                sender: Box::new(FailingSender),
            },
            Channel {
                profile: profile("telegram", Some("Staking: "), None),
                sender: Box::new(recording.clone()),
            },
        ];

        let (_delta_tx, delta_rx) = delta_channel();
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let dispatcher = NotificationDispatcher::new(channels, delta_rx, shutdown_rx);

        dispatcher.dispatch(delta("alice", 1_500_000_000)).await;

        let sent = match recording.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(_) => Vec::new(),
        };
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, SubscriberId("alice".to_string()));
        assert_eq!(
            sent[0].1.body,
            "Staking: Delayed unstake ticket available to redeem for 1.5 SOL."
        );
    }
}
