//! Delayed-unstake ticket watcher.
//!
//! Polls a delayed-withdrawal program for unstake tickets becoming
//! redeemable and notifies each ticket's owner once per transition, over
//! the configured channels.

mod config;
mod shutdown;

use clap::Parser;
use config::load_config;
use shutdown::shutdown_signal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use uwatch_core::events::delta_channel;
use uwatch_core::notify::{
    Channel, ChannelProfile, ChannelSender, HttpChannelSender, NotificationDispatcher,
};
use uwatch_core::poller::TicketPoller;
use uwatch_core::provider::{HttpSubscriberDirectory, HttpTicketSource, RpcChainClock};
use uwatch_core::tickets::eligibility::MaturityPolicy;

/// Delayed-unstake ticket watcher
#[derive(Parser, Debug)]
#[command(name = "uwatch-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./uwatch-config.toml")]
    config: PathBuf,

    /// Override the Solana JSON-RPC endpoint
    #[arg(long, env = "UWATCH_RPC_URL")]
    rpc_url: Option<Url>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting uwatch-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut file_config = load_config(&args.config).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(rpc_url) = args.rpc_url {
        file_config.provider.rpc_url = rpc_url;
    }
    tracing::info!("Configuration loaded from {:?}", args.config);

    // One client shared by every collaborator; per-request work is cheap.
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let source = Arc::new(HttpTicketSource::new(
        file_config.provider.tickets_url.clone(),
        http_client.clone(),
    ));
    let clock = Arc::new(RpcChainClock::new(
        file_config.provider.rpc_url.clone(),
        http_client.clone(),
    ));
    let directory = Arc::new(HttpSubscriberDirectory::new(
        file_config.provider.subscribers_url.clone(),
        http_client.clone(),
    ));

    let policy = MaturityPolicy {
        min_epochs: file_config.poller.min_epochs,
        grace: file_config.poller.grace,
    };

    let channels: Vec<Channel> = file_config
        .channels
        .iter()
        .map(|c| Channel {
            profile: ChannelProfile {
                name: c.name.clone(),
                body_prefix: c.body_prefix.clone(),
                subject: c.subject.clone(),
            },
            sender: Box::new(HttpChannelSender::new(c.endpoint.clone(), http_client.clone()))
                as Box<dyn ChannelSender>,
        })
        .collect();

    let (delta_tx, delta_rx) = delta_channel();
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let poller = TicketPoller::new(
        source,
        clock,
        directory,
        policy,
        Duration::from_secs(file_config.poller.interval_secs),
        delta_tx,
        shutdown_rx.clone(),
    );
    let dispatcher = NotificationDispatcher::new(channels, delta_rx, shutdown_rx);

    let poller_handle = tokio::spawn(poller.run());
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    // Wait for SIGTERM/SIGINT, then let the in-flight cycle finish.
    shutdown_signal().await;
    let _ = shutdown_tx.send(true);

    let _ = poller_handle.await;
    let _ = dispatcher_handle.await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
