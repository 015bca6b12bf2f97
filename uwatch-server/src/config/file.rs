//! TOML file configuration structures.
//!
//! These structs directly map to the `uwatch-config.toml` file format.

use serde::{Deserialize, Serialize};
use url::Url;
use uwatch_core::tickets::eligibility::GraceThreshold;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// Data-provider endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Endpoint returning the full outstanding ticket set as JSON.
    pub tickets_url: Url,
    /// Solana JSON-RPC endpoint used for the chain clock.
    pub rpc_url: Url,
    /// Subscriber directory endpoint.
    pub subscribers_url: Url,
}

/// Poller tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds between polling cycles. The default is multi-minute to
    /// respect provider rate limits.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Full epochs a ticket must mature before the grace window applies.
    #[serde(default = "default_min_epochs")]
    pub min_epochs: u64,
    /// Grace window applied in the boundary epoch, e.g.
    /// `grace = { seconds = 1800 }` or `grace = { slots = 2700 }`.
    #[serde(default = "default_grace")]
    pub grace: GraceThreshold,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            min_epochs: default_min_epochs(),
            grace: default_grace(),
        }
    }
}

fn default_interval_secs() -> u64 {
    300
}

fn default_min_epochs() -> u64 {
    1
}

fn default_grace() -> GraceThreshold {
    GraceThreshold::Seconds(1800)
}

/// One notification channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Channel name used in logs (e.g. "telegram", "email").
    pub name: String,
    /// Gateway endpoint the rendered notification is POSTed to.
    pub endpoint: Url,
    /// Prepended to the message body on this channel.
    #[serde(default)]
    pub body_prefix: Option<String>,
    /// Subject line for channels that carry one.
    #[serde(default)]
    pub subject: Option<String>,
}
