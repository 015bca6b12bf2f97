//! Time-windowed maturation policy.
//!
//! The eligibility heuristics seen across deployments (a direct due flag
//! from the provider, epoch delta plus wall-clock grace, epoch delta plus
//! slot grace) are all instances of one rule: a ticket matures after
//! `min_epochs` full epochs, with a grace window applied in the boundary
//! epoch. The threshold values are deployment configuration, not constants.

use super::Ticket;
use serde::{Deserialize, Serialize};

/// Chain-time snapshot used to evaluate ticket maturity.
///
/// Recomputed fresh every polling cycle; never cached across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityContext {
    pub current_epoch: u64,
    pub current_slot: u64,
    pub first_slot_of_epoch: u64,
    /// Unix seconds of the current slot, when the provider yields one.
    pub current_slot_timestamp: Option<i64>,
    /// Unix seconds of the epoch's first slot, when the provider yields one.
    pub first_slot_timestamp: Option<i64>,
}

/// Grace window applied in the boundary epoch
/// (`epochs_elapsed == min_epochs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraceThreshold {
    /// Wall-clock seconds elapsed since the start of the current epoch.
    Seconds(u64),
    /// Slots elapsed since the start of the current epoch, for deployments
    /// where block-time data is unreliable.
    Slots(u64),
}

/// Outcome of a maturity evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Due,
    NotDue,
    /// The context is missing the timing data the grace check needs.
    /// Callers must fail closed: treat as not due and report a warning,
    /// never an error.
    Indeterminate,
}

/// Configurable maturation policy deciding when a ticket is redeemable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityPolicy {
    /// Full epochs a ticket must age before the grace window applies.
    pub min_epochs: u64,
    pub grace: GraceThreshold,
}

impl MaturityPolicy {
    /// Decide whether `ticket` is redeemable under this policy at the
    /// chain time described by `ctx`.
    ///
    /// Pure and synchronous; the elapsed-exactly-at-threshold case counts
    /// as due.
    pub fn evaluate(&self, ticket: &Ticket, ctx: &EligibilityContext) -> Eligibility {
        let epochs_elapsed = ctx.current_epoch.saturating_sub(ticket.created_epoch);

        if epochs_elapsed > self.min_epochs {
            return Eligibility::Due;
        }
        if epochs_elapsed < self.min_epochs {
            return Eligibility::NotDue;
        }

        // Boundary epoch: the ticket matures once the grace window into the
        // current epoch has passed.
        match self.grace {
            GraceThreshold::Seconds(secs) => {
                match (ctx.current_slot_timestamp, ctx.first_slot_timestamp) {
                    (Some(now), Some(epoch_start)) => {
                        if now.saturating_sub(epoch_start) >= secs as i64 {
                            Eligibility::Due
                        } else {
                            Eligibility::NotDue
                        }
                    }
                    _ => Eligibility::Indeterminate,
                }
            }
            GraceThreshold::Slots(slots) => {
                if ctx.current_slot.saturating_sub(ctx.first_slot_of_epoch) >= slots {
                    Eligibility::Due
                } else {
                    Eligibility::NotDue
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::{SubscriberId, TicketId};

    fn ticket(created_epoch: u64) -> Ticket {
        Ticket {
            id: TicketId("ticket".to_string()),
            owner: SubscriberId("owner".to_string()),
            state_account: "state".to_string(),
            lamports: 0,
            created_epoch,
            is_due: None,
            due_at: None,
        }
    }

    fn ctx(current_epoch: u64, elapsed_secs: Option<i64>) -> EligibilityContext {
        EligibilityContext {
            current_epoch,
            current_slot: 1_000,
            first_slot_of_epoch: 0,
            current_slot_timestamp: elapsed_secs.map(|s| 1_700_000_000 + s),
            first_slot_timestamp: elapsed_secs.map(|_| 1_700_000_000),
        }
    }

    const POLICY: MaturityPolicy = MaturityPolicy {
        min_epochs: 1,
        grace: GraceThreshold::Seconds(1800),
    };

    #[test]
    fn past_boundary_epoch_is_due() {
        // Created at epoch 10, now epoch 12: two full epochs elapsed.
        let eligibility = POLICY.evaluate(&ticket(10), &ctx(12, Some(0)));
        assert_eq!(eligibility, Eligibility::Due);
    }

    #[test]
    fn boundary_epoch_inside_grace_window_is_not_due() {
        let eligibility = POLICY.evaluate(&ticket(10), &ctx(11, Some(500)));
        assert_eq!(eligibility, Eligibility::NotDue);
    }

    #[test]
    fn boundary_epoch_past_grace_window_is_due() {
        let eligibility = POLICY.evaluate(&ticket(10), &ctx(11, Some(2000)));
        assert_eq!(eligibility, Eligibility::Due);
    }

    #[test]
    fn grace_boundary_is_inclusive() {
        assert_eq!(
            POLICY.evaluate(&ticket(10), &ctx(11, Some(1800))),
            Eligibility::Due
        );
        assert_eq!(
            POLICY.evaluate(&ticket(10), &ctx(11, Some(1799))),
            Eligibility::NotDue
        );
    }

    #[test]
    fn before_boundary_epoch_is_not_due() {
        let eligibility = POLICY.evaluate(&ticket(10), &ctx(10, Some(10_000)));
        assert_eq!(eligibility, Eligibility::NotDue);
    }

    #[test]
    fn missing_timestamps_fail_closed() {
        // The provider yielded no block times; the grace check cannot run.
        let eligibility = POLICY.evaluate(&ticket(10), &ctx(11, None));
        assert_eq!(eligibility, Eligibility::Indeterminate);
    }

    #[test]
    fn missing_timestamps_irrelevant_outside_boundary_epoch() {
        assert_eq!(POLICY.evaluate(&ticket(10), &ctx(12, None)), Eligibility::Due);
        assert_eq!(
            POLICY.evaluate(&ticket(10), &ctx(10, None)),
            Eligibility::NotDue
        );
    }

    #[test]
    fn slot_grace_threshold_is_inclusive() {
        let policy = MaturityPolicy {
            min_epochs: 2,
            grace: GraceThreshold::Slots(600),
        };
        let mut context = ctx(12, None);
        context.first_slot_of_epoch = 5_000;

        context.current_slot = 5_600;
        assert_eq!(policy.evaluate(&ticket(10), &context), Eligibility::Due);

        context.current_slot = 5_599;
        assert_eq!(policy.evaluate(&ticket(10), &context), Eligibility::NotDue);
    }
}
