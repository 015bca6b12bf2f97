//! Event plumbing between the polling and notification stages.
//!
//! # Event Flow
//!
//! 1. `TicketPoller` diffs consecutive snapshots per subscriber
//! 2. Non-empty diffs become `RedeemableDelta` -> `NotificationDispatcher`
//!
//! Deltas are ephemeral: they exist for one dispatch and are never
//! replayed. A delta lost to a dropped receiver is not re-detected.

pub mod channels;
pub mod types;

pub use channels::{DEFAULT_CHANNEL_BUFFER, DeltaReceiver, DeltaSender, delta_channel};
pub use types::RedeemableDelta;
