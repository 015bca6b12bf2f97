//! Collaborator boundaries: ledger data provider, chain clock and
//! subscriber directory.
//!
//! The watcher core only depends on the traits in this module; the
//! concrete implementations talk HTTP/JSON-RPC and are wired in by the
//! server binary. None of them retry internally: a failure propagates to
//! the poller, which aborts the cycle and waits for the next tick.

pub mod directory;
pub mod http_source;
pub mod rpc_clock;

pub use directory::HttpSubscriberDirectory;
pub use http_source::HttpTicketSource;
pub use rpc_clock::RpcChainClock;

use crate::tickets::eligibility::EligibilityContext;
use crate::tickets::{SubscriberId, Ticket};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the ledger data provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP transport error
    #[error("provider request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider endpoint answered with a non-success status
    #[error("provider API error: {message}")]
    Api { message: String },

    /// Response body did not decode into the expected shape
    #[error("provider response decoding error: {0}")]
    Decode(String),

    /// JSON-RPC level error
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Errors from the subscriber directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// HTTP transport error
    #[error("directory request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Directory endpoint answered with a non-success status
    #[error("directory API error: {message}")]
    Api { message: String },
}

/// Fetches the full set of outstanding delayed-unstake tickets.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Return the full current ticket set. No filtering, no pagination
    /// state retained between calls.
    async fn fetch_all(&self) -> Result<Vec<Ticket>, ProviderError>;
}

/// Supplies a fresh chain-time snapshot for eligibility evaluation.
#[async_trait]
pub trait ChainClock: Send + Sync {
    async fn snapshot(&self) -> Result<EligibilityContext, ProviderError>;
}

/// Supplies the authoritative list of watched subscribers for one cycle.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<SubscriberId>, DirectoryError>;
}
