//! HTTP subscriber directory.

use super::{DirectoryError, SubscriberDirectory};
use crate::tickets::SubscriberId;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Lists watched subscribers from the subscriber-directory service.
///
/// The directory is authoritative per cycle: a wallet absent from the
/// returned list stops receiving notifications starting the next cycle.
pub struct HttpSubscriberDirectory {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpSubscriberDirectory {
    pub fn new(endpoint: Url, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }
}

#[async_trait]
impl SubscriberDirectory for HttpSubscriberDirectory {
    async fn list(&self) -> Result<Vec<SubscriberId>, DirectoryError> {
        let response = self.http_client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Api {
                message: format!("directory endpoint returned {status}"),
            });
        }

        let addresses: Vec<String> = response.json().await?;
        debug!(subscribers = addresses.len(), "Fetched subscriber list");

        Ok(addresses.into_iter().map(SubscriberId).collect())
    }
}
