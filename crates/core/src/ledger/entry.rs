//! Domain types for transaction submission.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a petty-cash movement was paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash from the float.
    Cash,
    /// Check drawn against the float account.
    Check,
    /// Company card.
    Card,
}

impl PaymentMethod {
    /// Returns the string representation of the payment method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Check => "check",
            Self::Card => "card",
        }
    }

    /// Parses a payment method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "check" => Some(Self::Check),
            "card" => Some(Self::Card),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque reference to an uploaded receipt.
///
/// The service never touches file bytes; it stores whatever reference the
/// upload layer hands it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRef {
    /// URL where the receipt can be fetched.
    pub url: String,
    /// Original file name as uploaded.
    pub file_name: String,
}

/// Input for submitting a new petty-cash transaction.
///
/// Sign convention: expenses are negative, credits positive. The convention
/// is the caller's responsibility; the engine validates only that the amount
/// is a valid nonzero 2-dp decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// User-supplied transaction date (may be backdated).
    pub date: DateTime<Utc>,
    /// What the money was spent on or received for.
    pub description: String,
    /// Signed amount (negative = expense, positive = credit).
    pub amount: Decimal,
    /// Who received the cash or paid it in.
    pub received_by: String,
    /// How the movement was paid.
    pub payment_method: PaymentMethod,
    /// Optional receipt reference.
    pub receipt: Option<ReceiptRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_as_str() {
        assert_eq!(PaymentMethod::Cash.as_str(), "cash");
        assert_eq!(PaymentMethod::Check.as_str(), "check");
        assert_eq!(PaymentMethod::Card.as_str(), "card");
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("cash"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::parse("CHECK"), Some(PaymentMethod::Check));
        assert_eq!(PaymentMethod::parse("Card"), Some(PaymentMethod::Card));
        assert_eq!(PaymentMethod::parse("wire"), None);
    }

    #[test]
    fn test_payment_method_display() {
        assert_eq!(format!("{}", PaymentMethod::Cash), "cash");
    }
}
