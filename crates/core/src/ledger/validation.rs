//! Business rule validation for ledger input.
//!
//! All checks run before any persistence so a rejected submission leaves
//! no partial state behind.

use rust_decimal::Decimal;

use cashfloat_shared::types::validate_amount;

use crate::ledger::entry::NewTransaction;
use crate::ledger::error::LedgerError;

/// Validates a transaction submission.
///
/// # Errors
///
/// Returns the first failed check:
/// - `LedgerError::MissingDescription` for a blank description
/// - `LedgerError::MissingReceivedBy` for a blank received-by name
/// - `LedgerError::InvalidAmount` for a zero, over-precise, or out-of-range
///   amount
pub fn validate_new_transaction(input: &NewTransaction) -> Result<(), LedgerError> {
    if input.description.trim().is_empty() {
        return Err(LedgerError::MissingDescription);
    }
    if input.received_by.trim().is_empty() {
        return Err(LedgerError::MissingReceivedBy);
    }
    validate_amount(input.amount)?;
    Ok(())
}

/// Validates a replenishment request amount.
///
/// Replenishments inject cash into the float, so beyond the usual decimal
/// checks the amount must be strictly positive.
///
/// # Errors
///
/// Returns `LedgerError::NonPositiveRequestedAmount` or
/// `LedgerError::InvalidAmount`.
pub fn validate_requested_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveRequestedAmount);
    }
    validate_amount(amount)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::entry::PaymentMethod;
    use cashfloat_shared::types::AmountError;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn valid_input() -> NewTransaction {
        NewTransaction {
            date: Utc::now(),
            description: "Office supplies".to_string(),
            amount: dec!(-45.50),
            received_by: "Stationery World".to_string(),
            payment_method: PaymentMethod::Cash,
            receipt: None,
        }
    }

    #[test]
    fn test_valid_transaction_passes() {
        assert!(validate_new_transaction(&valid_input()).is_ok());
    }

    #[test]
    fn test_blank_description_rejected() {
        let mut input = valid_input();
        input.description = "   ".to_string();
        assert_eq!(
            validate_new_transaction(&input),
            Err(LedgerError::MissingDescription)
        );
    }

    #[test]
    fn test_blank_received_by_rejected() {
        let mut input = valid_input();
        input.received_by = String::new();
        assert_eq!(
            validate_new_transaction(&input),
            Err(LedgerError::MissingReceivedBy)
        );
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut input = valid_input();
        input.amount = dec!(0);
        assert_eq!(
            validate_new_transaction(&input),
            Err(LedgerError::InvalidAmount(AmountError::Zero))
        );
    }

    #[test]
    fn test_over_precise_amount_rejected() {
        let mut input = valid_input();
        input.amount = dec!(1.005);
        assert_eq!(
            validate_new_transaction(&input),
            Err(LedgerError::InvalidAmount(AmountError::TooPrecise))
        );
    }

    #[test]
    fn test_requested_amount_must_be_positive() {
        assert_eq!(
            validate_requested_amount(dec!(-100.00)),
            Err(LedgerError::NonPositiveRequestedAmount)
        );
        assert_eq!(
            validate_requested_amount(dec!(0)),
            Err(LedgerError::NonPositiveRequestedAmount)
        );
        assert!(validate_requested_amount(dec!(500.00)).is_ok());
    }
}
