//! Ticket domain model.

pub mod eligibility;
pub mod grouping;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Stable identifier of a delayed-unstake ticket account (base58 PDA).
///
/// This is the only field used to decide whether two tickets are "the same"
/// when diffing consecutive polling cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub String);

impl std::fmt::Display for TicketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wallet address of a watched subscriber (base58).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub String);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One delayed-withdrawal request recorded on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    /// Beneficiary allowed to redeem the ticket.
    pub owner: SubscriberId,
    /// Pool/program state account the ticket belongs to. Opaque passthrough.
    pub state_account: String,
    /// Amount in the smallest on-chain denomination. Zero is valid.
    pub lamports: u64,
    /// Epoch number at ticket creation.
    pub created_epoch: u64,
    /// Provider-supplied redemption flag. `None` means the provider did not
    /// decide and the maturity policy must.
    pub is_due: Option<bool>,
    /// Best-effort estimate of when the redemption window opens.
    pub due_at: Option<OffsetDateTime>,
}
