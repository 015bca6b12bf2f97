//! HTTP ticket source.
//!
//! Fetches the outstanding ticket set from the provider's tickets API.
//! Account decoding happens provider-side; this adapter only maps the wire
//! records into the domain model.

use super::{ProviderError, TicketSource};
use crate::tickets::{SubscriberId, Ticket, TicketId};
use async_trait::async_trait;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

/// Wire representation of one delayed-unstake ticket record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketRecord {
    ticket_pda: String,
    state_address: String,
    beneficiary: String,
    lamports_amount: u64,
    created_epoch: u64,
    /// Absent when the provider leaves the due decision to the watcher.
    #[serde(default)]
    ticket_due: Option<bool>,
    /// Unix seconds; absent when the provider cannot estimate it.
    #[serde(default)]
    ticket_due_date: Option<i64>,
}

impl From<TicketRecord> for Ticket {
    fn from(record: TicketRecord) -> Self {
        Ticket {
            id: TicketId(record.ticket_pda),
            owner: SubscriberId(record.beneficiary),
            state_account: record.state_address,
            lamports: record.lamports_amount,
            created_epoch: record.created_epoch,
            is_due: record.ticket_due,
            due_at: record
                .ticket_due_date
                .and_then(|ts| OffsetDateTime::from_unix_timestamp(ts).ok()),
        }
    }
}

/// Fetches the full outstanding ticket set from an HTTP endpoint.
pub struct HttpTicketSource {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl HttpTicketSource {
    pub fn new(endpoint: Url, http_client: reqwest::Client) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }
}

#[async_trait]
impl TicketSource for HttpTicketSource {
    async fn fetch_all(&self) -> Result<Vec<Ticket>, ProviderError> {
        let response = self.http_client.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Api {
                message: format!("tickets endpoint returned {status}"),
            });
        }

        let records: Vec<TicketRecord> = response.json().await?;
        debug!(
            tickets = records.len(),
            "Fetched outstanding delayed-unstake tickets"
        );

        Ok(records.into_iter().map(Ticket::from).collect())
    }
}
