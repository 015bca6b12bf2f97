//! Event channel factories and handles.

use super::types::RedeemableDelta;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// Enough to absorb a cycle that flags many subscribers at once while
/// keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for RedeemableDelta events.
pub type DeltaSender = mpsc::Sender<RedeemableDelta>;
/// Receiver handle for RedeemableDelta events.
pub type DeltaReceiver = mpsc::Receiver<RedeemableDelta>;

/// Create a new RedeemableDelta channel.
pub fn delta_channel() -> (DeltaSender, DeltaReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
