//! Decimal amount parsing and validation.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values with at most two decimal
//! places, matching the `NUMERIC(10,2)` storage columns.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced when parsing or validating a monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Input is not a parseable decimal number.
    #[error("invalid decimal amount: {0}")]
    Invalid(String),

    /// More than two decimal places.
    #[error("amount must have at most 2 decimal places")]
    TooPrecise,

    /// Magnitude exceeds the supported NUMERIC(10,2) range.
    #[error("amount exceeds the supported range")]
    OutOfRange,

    /// Zero amounts carry no ledger meaning.
    #[error("amount must not be zero")]
    Zero,
}

/// Largest magnitude representable in a NUMERIC(10,2) column.
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2) // 99,999,999.99
}

/// Parses a signed amount from its string form and validates it.
///
/// # Errors
///
/// Returns an `AmountError` describing the first failed check.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| AmountError::Invalid(raw.trim().to_string()))?;
    validate_amount(amount)
}

/// Validates a signed amount: nonzero, at most 2 decimal places, in range.
///
/// # Errors
///
/// Returns an `AmountError` describing the first failed check.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount.is_zero() {
        return Err(AmountError::Zero);
    }
    if amount.round_dp(2) != amount {
        return Err(AmountError::TooPrecise);
    }
    if amount.abs() > max_amount() {
        return Err(AmountError::OutOfRange);
    }
    Ok(amount)
}

/// Formats an amount with exactly two decimal places (e.g. `-45.50`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("-45.50", dec!(-45.50))]
    #[case("500", dec!(500))]
    #[case(" 250.00 ", dec!(250.00))]
    #[case("-0.01", dec!(-0.01))]
    fn test_parse_valid_amounts(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw), Ok(expected));
    }

    #[rstest]
    #[case("abc")]
    #[case("12.3.4")]
    #[case("")]
    fn test_parse_invalid_amounts(#[case] raw: &str) {
        assert!(matches!(parse_amount(raw), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_zero_rejected() {
        assert_eq!(parse_amount("0"), Err(AmountError::Zero));
        assert_eq!(parse_amount("0.00"), Err(AmountError::Zero));
    }

    #[test]
    fn test_three_decimal_places_rejected() {
        assert_eq!(parse_amount("10.005"), Err(AmountError::TooPrecise));
        assert_eq!(validate_amount(dec!(0.001)), Err(AmountError::TooPrecise));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(parse_amount("100000000.00"), Err(AmountError::OutOfRange));
        assert_eq!(parse_amount("-100000000.00"), Err(AmountError::OutOfRange));
        // Boundary value is accepted.
        assert_eq!(parse_amount("99999999.99"), Ok(dec!(99999999.99)));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(-45.5)), "-45.50");
        assert_eq!(format_amount(dec!(500)), "500.00");
        assert_eq!(format_amount(dec!(444.50)), "444.50");
    }
}
