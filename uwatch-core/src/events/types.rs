//! Event type definitions.

use crate::tickets::{SubscriberId, Ticket};

/// Emitted by the poller when a subscriber gained newly redeemable tickets
/// since the previous cycle.
///
/// `tickets` is never empty: subscribers whose due set is empty or
/// unchanged produce no event at all. Order follows the snapshot's
/// arrival order.
#[derive(Debug, Clone)]
pub struct RedeemableDelta {
    pub subscriber: SubscriberId,
    pub tickets: Vec<Ticket>,
}
