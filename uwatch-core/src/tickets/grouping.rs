//! Partitioning of the global ticket set into per-subscriber snapshots.

use super::eligibility::{Eligibility, EligibilityContext, MaturityPolicy};
use super::{SubscriberId, Ticket, TicketId};
use std::collections::HashMap;
use tracing::warn;

/// Per-subscriber aggregate of currently redeemable tickets, in arrival
/// order. Owned exclusively by the poller's snapshot store.
#[derive(Debug, Clone)]
pub struct SubscriberSnapshot {
    pub subscriber: SubscriberId,
    pub tickets: Vec<Ticket>,
}

impl SubscriberSnapshot {
    pub fn empty(subscriber: SubscriberId) -> Self {
        Self {
            subscriber,
            tickets: Vec::new(),
        }
    }

    pub fn contains(&self, id: &TicketId) -> bool {
        self.tickets.iter().any(|t| &t.id == id)
    }
}

/// Group due tickets by owner for the watched subscribers.
///
/// Every id in `subscribers` gets an entry, empty when it owns nothing due;
/// owners outside `subscribers` are dropped even when their tickets are due.
/// The provider's `is_due` flag wins when present, otherwise `policy`
/// decides. An indeterminate evaluation counts as not due and is surfaced
/// as a single warning per call; the ticket stays in the next fetch, so
/// nothing is lost by waiting a cycle.
pub fn group_due_tickets(
    tickets: Vec<Ticket>,
    ctx: &EligibilityContext,
    policy: &MaturityPolicy,
    subscribers: &[SubscriberId],
) -> HashMap<SubscriberId, SubscriberSnapshot> {
    let mut snapshots: HashMap<SubscriberId, SubscriberSnapshot> = subscribers
        .iter()
        .map(|s| (s.clone(), SubscriberSnapshot::empty(s.clone())))
        .collect();

    let mut indeterminate = 0usize;
    for ticket in tickets {
        let due = match ticket.is_due {
            Some(flag) => flag,
            None => match policy.evaluate(&ticket, ctx) {
                Eligibility::Due => true,
                Eligibility::NotDue => false,
                Eligibility::Indeterminate => {
                    indeterminate += 1;
                    false
                }
            },
        };
        if !due {
            continue;
        }
        if let Some(snapshot) = snapshots.get_mut(&ticket.owner) {
            snapshot.tickets.push(ticket);
        }
    }

    if indeterminate > 0 {
        warn!(
            tickets = indeterminate,
            "Missing slot timestamps, treating boundary-epoch tickets as not yet due"
        );
    }

    snapshots
}
