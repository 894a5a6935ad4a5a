//! Workflow domain types for the approval lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status shared by transactions and replenishment requests.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// Both targets are terminal; a decided entity never changes status again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved and counted in the ledger (terminal).
    Approved,
    /// Rejected with a justification (terminal).
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true once a decision has been made.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The decision an approver may take on a pending entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve the entity.
    Approved,
    /// Reject the entity (requires a comment).
    Rejected,
}

impl Decision {
    /// Returns the string representation of the decision.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a decision from a string.
    ///
    /// Only the two terminal statuses are valid decision targets.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns the status this decision transitions the entity into.
    #[must_use]
    pub const fn target_status(&self) -> ApprovalStatus {
        match self {
            Self::Approved => ApprovalStatus::Approved,
            Self::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// A validated state transition with audit data.
///
/// Each variant captures the resulting status and the audit trail
/// information (who decided, when, why).
#[derive(Debug, Clone)]
pub enum DecisionAction {
    /// Approve a pending entity.
    Approve {
        /// The new status after approval.
        new_status: ApprovalStatus,
        /// The user who made the decision.
        decided_by: Uuid,
        /// When the decision was made.
        decided_at: DateTime<Utc>,
        /// Optional notes from the approver.
        comments: Option<String>,
    },
    /// Reject a pending entity.
    Reject {
        /// The new status after rejection.
        new_status: ApprovalStatus,
        /// The user who made the decision.
        decided_by: Uuid,
        /// When the decision was made.
        decided_at: DateTime<Utc>,
        /// The justification for rejecting (always present).
        comments: String,
    },
}

impl DecisionAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> ApprovalStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }

    /// Returns the deciding user.
    #[must_use]
    pub const fn decided_by(&self) -> Uuid {
        match self {
            Self::Approve { decided_by, .. } | Self::Reject { decided_by, .. } => *decided_by,
        }
    }

    /// Returns the decision timestamp.
    #[must_use]
    pub const fn decided_at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { decided_at, .. } | Self::Reject { decided_at, .. } => *decided_at,
        }
    }

    /// Returns the comments attached to the decision, if any.
    #[must_use]
    pub fn comments(&self) -> Option<&str> {
        match self {
            Self::Approve { comments, .. } => comments.as_deref(),
            Self::Reject { comments, .. } => Some(comments.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ApprovalStatus::Pending.as_str(), "pending");
        assert_eq!(ApprovalStatus::Approved.as_str(), "approved");
        assert_eq!(ApprovalStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            ApprovalStatus::parse("pending"),
            Some(ApprovalStatus::Pending)
        );
        assert_eq!(
            ApprovalStatus::parse("APPROVED"),
            Some(ApprovalStatus::Approved)
        );
        assert_eq!(
            ApprovalStatus::parse("Rejected"),
            Some(ApprovalStatus::Rejected)
        );
        assert_eq!(ApprovalStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!ApprovalStatus::Pending.is_terminal());
        assert!(ApprovalStatus::Approved.is_terminal());
        assert!(ApprovalStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_decision_parse_rejects_non_terminal_targets() {
        assert_eq!(Decision::parse("approved"), Some(Decision::Approved));
        assert_eq!(Decision::parse("rejected"), Some(Decision::Rejected));
        assert_eq!(Decision::parse("pending"), None);
        assert_eq!(Decision::parse("voided"), None);
    }

    #[test]
    fn test_decision_target_status() {
        assert_eq!(
            Decision::Approved.target_status(),
            ApprovalStatus::Approved
        );
        assert_eq!(
            Decision::Rejected.target_status(),
            ApprovalStatus::Rejected
        );
    }
}
