//! Rendering of redeemable-ticket notifications.

use crate::tickets::{LAMPORTS_PER_SOL, Ticket};
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert lamports to SOL, rounded to 5 decimal places with trailing
/// zeros stripped.
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    (Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL))
        .round_dp_with_strategy(5, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Render the core human-readable message for a non-empty delta.
///
/// Per-channel framing (prefix, subject) is applied separately by the
/// dispatcher; this is the shared body every channel carries.
pub fn render_redeemable_message(tickets: &[Ticket]) -> String {
    if tickets.len() == 1 {
        format!(
            "Delayed unstake ticket available to redeem for {} SOL.",
            lamports_to_sol(tickets[0].lamports)
        )
    } else {
        let mut message = String::from("Delayed unstake tickets available to redeem:\n");
        for ticket in tickets {
            message.push_str(&format!(
                "Ticket for {} SOL.\n",
                lamports_to_sol(ticket.lamports)
            ));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::{SubscriberId, TicketId};

    fn ticket(lamports: u64) -> Ticket {
        Ticket {
            id: TicketId("ticket".to_string()),
            owner: SubscriberId("owner".to_string()),
            state_account: "state".to_string(),
            lamports,
            created_epoch: 10,
            is_due: Some(true),
            due_at: None,
        }
    }

    #[test]
    fn converts_lamports_with_five_decimal_rounding() {
        assert_eq!(lamports_to_sol(1_500_000_000).to_string(), "1.5");
        assert_eq!(lamports_to_sol(1_234_567).to_string(), "0.00123");
        assert_eq!(lamports_to_sol(999_999_999).to_string(), "1");
        assert_eq!(lamports_to_sol(0).to_string(), "0");
    }

    #[test]
    fn single_ticket_message() {
        let message = render_redeemable_message(&[ticket(1_500_000_000)]);
        assert_eq!(
            message,
            "Delayed unstake ticket available to redeem for 1.5 SOL."
        );
    }

    #[test]
    fn multiple_tickets_list_one_line_each_in_order() {
        let message =
            render_redeemable_message(&[ticket(1_500_000_000), ticket(1_500_000_000)]);
        assert_eq!(
            message,
            "Delayed unstake tickets available to redeem:\n\
             Ticket for 1.5 SOL.\n\
             Ticket for 1.5 SOL.\n"
        );
    }
}
