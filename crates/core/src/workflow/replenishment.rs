//! Replenishment credit derivation.
//!
//! Approving a replenishment request injects cash into the float. The
//! injection is itself an ordinary ledger transaction, derived here so the
//! mapping is deterministic: same request, same credit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ledger::entry::{NewTransaction, PaymentMethod};

/// Received-by name used for every replenishment credit.
pub const FLOAT_RECIPIENT: &str = "Cash Float";

/// Derives the credit transaction produced by approving a replenishment.
///
/// The credit carries the full requested amount as a positive value, is
/// always paid in cash to the float, and echoes the request's reason in
/// its description.
#[must_use]
pub fn replenishment_credit(
    reason: &str,
    requested_amount: Decimal,
    date: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        date,
        description: format!("Cash replenishment - {reason}"),
        amount: requested_amount,
        received_by: FLOAT_RECIPIENT.to_string(),
        payment_method: PaymentMethod::Cash,
        receipt: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_carries_requested_amount() {
        let credit = replenishment_credit("Monthly top-up", dec!(500.00), Utc::now());
        assert_eq!(credit.amount, dec!(500.00));
        assert!(credit.amount.is_sign_positive());
    }

    #[test]
    fn test_credit_shape_is_deterministic() {
        let now = Utc::now();
        let a = replenishment_credit("Quarter float", dec!(250.00), now);
        let b = replenishment_credit("Quarter float", dec!(250.00), now);
        assert_eq!(a, b);
    }

    #[test]
    fn test_credit_description_and_recipient() {
        let credit = replenishment_credit("Low balance", dec!(100.00), Utc::now());
        assert_eq!(credit.description, "Cash replenishment - Low balance");
        assert_eq!(credit.received_by, FLOAT_RECIPIENT);
        assert_eq!(credit.payment_method, PaymentMethod::Cash);
        assert!(credit.receipt.is_none());
    }
}
