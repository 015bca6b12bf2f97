//! HTTP channel sender.
//!
//! Delivers notifications by POSTing JSON to a channel gateway endpoint.
//! The gateway owns the actual transport (push thread, SMS, email, chat
//! bot); this sender only hands over the rendered payload.

use super::dispatcher::{ChannelSender, DeliveryError, Notification};
use crate::tickets::SubscriberId;
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
struct DeliveryPayload<'a> {
    subscriber: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    body: &'a str,
}

/// Sends notifications to a single channel gateway over HTTP.
pub struct HttpChannelSender {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpChannelSender {
    pub fn new(endpoint: Url, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }
}

#[async_trait]
impl ChannelSender for HttpChannelSender {
    async fn send(
        &self,
        subscriber: &SubscriberId,
        notification: &Notification,
    ) -> Result<(), DeliveryError> {
        let payload = DeliveryPayload {
            subscriber: &subscriber.0,
            subject: notification.subject.as_deref(),
            body: &notification.body,
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
