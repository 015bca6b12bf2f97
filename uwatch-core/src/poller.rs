//! TicketPoller processor.
//!
//! The TicketPoller is responsible for:
//! - Waking on a fixed interval
//! - Fetching the full ticket set and a fresh chain-time snapshot
//! - Grouping due tickets per watched subscriber
//! - Diffing against the previous cycle's snapshots by ticket id
//! - Emitting `RedeemableDelta` events for non-empty diffs
//!
//! The per-subscriber snapshot store is owned by this task alone. At most
//! one cycle is in flight at a time: a tick that fires mid-cycle is
//! dropped, never queued, so no two cycles can race on the store.

use crate::events::DeltaSender;
use crate::events::types::RedeemableDelta;
use crate::provider::{ChainClock, DirectoryError, ProviderError, SubscriberDirectory, TicketSource};
use crate::tickets::eligibility::MaturityPolicy;
use crate::tickets::grouping::{SubscriberSnapshot, group_due_tickets};
use crate::tickets::{SubscriberId, Ticket};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Errors that abort a single polling cycle.
///
/// A failed cycle leaves the snapshot store untouched, so the next
/// successful cycle still diffs against the last committed state.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// TicketPoller drives the change-detection pipeline.
pub struct TicketPoller {
    source: Arc<dyn TicketSource>,
    clock: Arc<dyn ChainClock>,
    directory: Arc<dyn SubscriberDirectory>,
    policy: MaturityPolicy,
    interval: Duration,
    delta_tx: DeltaSender,
    shutdown_rx: watch::Receiver<bool>,
    /// Last committed due-ticket snapshot per watched subscriber.
    snapshots: HashMap<SubscriberId, SubscriberSnapshot>,
}

impl TicketPoller {
    /// Create a new TicketPoller.
    ///
    /// # Arguments
    ///
    /// * `source` - Ledger ticket provider
    /// * `clock` - Chain-time snapshot provider
    /// * `directory` - Subscriber directory, authoritative per cycle
    /// * `policy` - Maturation policy for tickets without a provider flag
    /// * `interval` - Time between polling cycles
    /// * `delta_tx` - Sender for RedeemableDelta events
    /// * `shutdown_rx` - Receiver for shutdown signal
    pub fn new(
        source: Arc<dyn TicketSource>,
        clock: Arc<dyn ChainClock>,
        directory: Arc<dyn SubscriberDirectory>,
        policy: MaturityPolicy,
        interval: Duration,
        delta_tx: DeltaSender,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            clock,
            directory,
            policy,
            interval,
            delta_tx,
            shutdown_rx,
            snapshots: HashMap::new(),
        }
    }

    /// Run the TicketPoller until shutdown is signaled.
    ///
    /// An in-flight cycle always runs to completion; shutdown takes effect
    /// on the next loop iteration, so the snapshot store is never left
    /// half-updated.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "TicketPoller started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                // Check for shutdown
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("TicketPoller received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        error!(error = %e, "Polling cycle aborted, keeping previous snapshots");
                    }
                }
            }
        }

        info!("TicketPoller shutdown complete");
    }

    /// Execute one polling cycle.
    ///
    /// No store mutation happens until every fetch has succeeded; an error
    /// anywhere aborts the whole cycle.
    async fn run_cycle(&mut self) -> Result<(), CycleError> {
        let subscribers = self.directory.list().await?;
        debug!(
            subscribers = subscribers.len(),
            "Polling data for watched subscribers"
        );

        let (tickets, ctx) =
            tokio::try_join!(self.source.fetch_all(), self.clock.snapshot())?;

        let grouped = group_due_tickets(tickets, &ctx, &self.policy, &subscribers);

        let mut deltas = Vec::new();
        for (subscriber, snapshot) in grouped {
            let newly_due: Option<Vec<Ticket>> = match self.snapshots.get(&subscriber) {
                Some(previous) => Some(
                    snapshot
                        .tickets
                        .iter()
                        .filter(|t| !previous.contains(&t.id))
                        .cloned()
                        .collect(),
                ),
                // First observation of this subscriber seeds the baseline;
                // already-due tickets did not "newly" become redeemable.
                None => None,
            };

            self.snapshots.insert(subscriber.clone(), snapshot);

            if let Some(tickets) = newly_due
                && !tickets.is_empty()
            {
                deltas.push(RedeemableDelta {
                    subscriber,
                    tickets,
                });
            }
        }

        // Unsubscribed wallets stop being diffed starting this cycle.
        self.snapshots.retain(|id, _| subscribers.contains(id));

        for delta in deltas {
            debug!(
                subscriber = %delta.subscriber,
                tickets = delta.tickets.len(),
                "Newly redeemable tickets detected"
            );
            if let Err(e) = self.delta_tx.send(delta).await {
                error!(error = %e, "Failed to send RedeemableDelta, receiver dropped");
            }
        }

        Ok(())
    }
}
