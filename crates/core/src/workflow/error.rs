//! Workflow error types for the approval lifecycle.

use thiserror::Error;
use uuid::Uuid;

use crate::workflow::types::ApprovalStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The entity has already been approved or rejected.
    #[error("entity is already {status}, no further transitions permitted")]
    AlreadyDecided {
        /// The terminal status the entity holds.
        status: ApprovalStatus,
    },

    /// The actor's role does not allow the requested action.
    #[error("role {role} is not permitted to {action}")]
    PermissionDenied {
        /// The actor's role.
        role: String,
        /// The attempted action.
        action: String,
    },

    /// A rejection was attempted without a justification.
    #[error("rejection requires a comment")]
    CommentRequired,

    /// The requested target status is not a valid decision.
    #[error("invalid decision target: {0}")]
    InvalidDecision(String),

    /// Transaction not found.
    #[error("transaction {0} not found")]
    TransactionNotFound(Uuid),

    /// Replenishment request not found.
    #[error("replenishment request {0} not found")]
    RequestNotFound(Uuid),

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::CommentRequired | Self::InvalidDecision(_) => 400,
            Self::PermissionDenied { .. } => 403,
            Self::TransactionNotFound(_) | Self::RequestNotFound(_) => 404,
            Self::AlreadyDecided { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyDecided { .. } => "ALREADY_DECIDED",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::CommentRequired => "COMMENT_REQUIRED",
            Self::InvalidDecision(_) => "INVALID_DECISION",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_decided_error() {
        let err = WorkflowError::AlreadyDecided {
            status: ApprovalStatus::Approved,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "ALREADY_DECIDED");
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_permission_denied_error() {
        let err = WorkflowError::PermissionDenied {
            role: "custodian".to_string(),
            action: "decide_transaction".to_string(),
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "PERMISSION_DENIED");
        assert!(err.to_string().contains("custodian"));
    }

    #[test]
    fn test_comment_required_error() {
        let err = WorkflowError::CommentRequired;
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "COMMENT_REQUIRED");
    }

    #[test]
    fn test_invalid_decision_error() {
        let err = WorkflowError::InvalidDecision("voided".to_string());
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_DECISION");
    }

    #[test]
    fn test_not_found_errors() {
        assert_eq!(
            WorkflowError::TransactionNotFound(Uuid::nil()).status_code(),
            404
        );
        assert_eq!(
            WorkflowError::RequestNotFound(Uuid::nil()).status_code(),
            404
        );
    }

    #[test]
    fn test_database_error() {
        let err = WorkflowError::Database("connection refused".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }
}
