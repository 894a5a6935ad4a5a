//! Error types for ledger operations.

use cashfloat_shared::types::AmountError;
use thiserror::Error;

/// Errors that can occur when validating or recording ledger input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount failed decimal validation.
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    /// Description is missing or blank.
    #[error("description is required")]
    MissingDescription,

    /// Received-by name is missing or blank.
    #[error("received by is required")]
    MissingReceivedBy,

    /// Replenishment amounts must be strictly positive.
    #[error("requested amount must be positive")]
    NonPositiveRequestedAmount,
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::MissingDescription => "MISSING_DESCRIPTION",
            Self::MissingReceivedBy => "MISSING_RECEIVED_BY",
            Self::NonPositiveRequestedAmount => "NON_POSITIVE_REQUESTED_AMOUNT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ledger_errors_are_validation_errors() {
        assert_eq!(LedgerError::MissingDescription.status_code(), 400);
        assert_eq!(LedgerError::MissingReceivedBy.status_code(), 400);
        assert_eq!(LedgerError::NonPositiveRequestedAmount.status_code(), 400);
        assert_eq!(
            LedgerError::InvalidAmount(AmountError::Zero).status_code(),
            400
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::MissingDescription.error_code(),
            "MISSING_DESCRIPTION"
        );
        assert_eq!(
            LedgerError::InvalidAmount(AmountError::TooPrecise).error_code(),
            "INVALID_AMOUNT"
        );
    }
}
