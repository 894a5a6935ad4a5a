//! Approval service for pending → approved/rejected transitions.
//!
//! This module implements the state machine shared by transactions and
//! replenishment requests. All methods are associated functions that
//! validate a transition and return the resulting [`DecisionAction`]
//! with audit trail information; persistence happens in the caller.

use chrono::Utc;
use uuid::Uuid;

use crate::workflow::capability::{Action, UserRole, authorize};
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApprovalStatus, Decision, DecisionAction};

/// Stateless service for approval decisions.
pub struct ApprovalService;

impl ApprovalService {
    /// Validates a decision on a pending entity.
    ///
    /// Checks run in this order, all before any mutation:
    /// 1. the actor's role must allow `action` (custodians never decide);
    /// 2. the entity must still be pending;
    /// 3. a rejection must carry a non-blank comment.
    ///
    /// # Arguments
    /// * `actor_role` - Role of the user making the decision
    /// * `action` - Which decide capability is being exercised
    /// * `current_status` - The entity's current status
    /// * `decision` - Approve or reject
    /// * `decided_by` - The deciding user
    /// * `comments` - Approver notes; mandatory for rejections
    ///
    /// # Errors
    /// * `WorkflowError::PermissionDenied` if the role may not decide
    /// * `WorkflowError::AlreadyDecided` if the entity is terminal
    /// * `WorkflowError::CommentRequired` for a comment-less rejection
    pub fn decide(
        actor_role: UserRole,
        action: Action,
        current_status: ApprovalStatus,
        decision: Decision,
        decided_by: Uuid,
        comments: Option<String>,
    ) -> Result<DecisionAction, WorkflowError> {
        authorize(actor_role, action)?;

        if current_status.is_terminal() {
            return Err(WorkflowError::AlreadyDecided {
                status: current_status,
            });
        }

        match decision {
            Decision::Approved => Ok(DecisionAction::Approve {
                new_status: ApprovalStatus::Approved,
                decided_by,
                decided_at: Utc::now(),
                comments,
            }),
            Decision::Rejected => {
                let comments = comments.filter(|c| !c.trim().is_empty());
                let Some(comments) = comments else {
                    return Err(WorkflowError::CommentRequired);
                };
                Ok(DecisionAction::Reject {
                    new_status: ApprovalStatus::Rejected,
                    decided_by,
                    decided_at: Utc::now(),
                    comments,
                })
            }
        }
    }

    /// Parses a raw decision target, mapping unknown values to
    /// `WorkflowError::InvalidDecision`.
    pub fn parse_decision(raw: &str) -> Result<Decision, WorkflowError> {
        Decision::parse(raw).ok_or_else(|| WorkflowError::InvalidDecision(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_from_pending() {
        let user_id = Uuid::new_v4();
        let action = ApprovalService::decide(
            UserRole::Accountant,
            Action::DecideTransaction,
            ApprovalStatus::Pending,
            Decision::Approved,
            user_id,
            None,
        )
        .expect("transition should succeed");

        assert_eq!(action.new_status(), ApprovalStatus::Approved);
        assert_eq!(action.decided_by(), user_id);
        assert_eq!(action.comments(), None);
    }

    #[test]
    fn test_approve_with_notes() {
        let action = ApprovalService::decide(
            UserRole::Admin,
            Action::DecideTransaction,
            ApprovalStatus::Pending,
            Decision::Approved,
            Uuid::new_v4(),
            Some("Looks good".to_string()),
        )
        .expect("transition should succeed");

        assert_eq!(action.comments(), Some("Looks good"));
    }

    #[test]
    fn test_reject_with_comment() {
        let action = ApprovalService::decide(
            UserRole::Accountant,
            Action::DecideTransaction,
            ApprovalStatus::Pending,
            Decision::Rejected,
            Uuid::new_v4(),
            Some("No receipt attached".to_string()),
        )
        .expect("transition should succeed");

        assert_eq!(action.new_status(), ApprovalStatus::Rejected);
        assert_eq!(action.comments(), Some("No receipt attached"));
    }

    #[test]
    fn test_reject_without_comment_fails() {
        let result = ApprovalService::decide(
            UserRole::Accountant,
            Action::DecideTransaction,
            ApprovalStatus::Pending,
            Decision::Rejected,
            Uuid::new_v4(),
            None,
        );
        assert!(matches!(result, Err(WorkflowError::CommentRequired)));
    }

    #[test]
    fn test_reject_with_blank_comment_fails() {
        for blank in ["", "   ", "\t\n"] {
            let result = ApprovalService::decide(
                UserRole::Accountant,
                Action::DecideTransaction,
                ApprovalStatus::Pending,
                Decision::Rejected,
                Uuid::new_v4(),
                Some(blank.to_string()),
            );
            assert!(matches!(result, Err(WorkflowError::CommentRequired)));
        }
    }

    #[test]
    fn test_decide_on_terminal_entity_fails() {
        for status in [ApprovalStatus::Approved, ApprovalStatus::Rejected] {
            let result = ApprovalService::decide(
                UserRole::Admin,
                Action::DecideTransaction,
                status,
                Decision::Approved,
                Uuid::new_v4(),
                None,
            );
            assert!(matches!(
                result,
                Err(WorkflowError::AlreadyDecided { .. })
            ));
        }
    }

    #[test]
    fn test_custodian_cannot_decide_even_pending() {
        let result = ApprovalService::decide(
            UserRole::Custodian,
            Action::DecideTransaction,
            ApprovalStatus::Pending,
            Decision::Approved,
            Uuid::new_v4(),
            None,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_custodian_permission_error_wins_over_already_decided() {
        // Permission is checked before entity state, so a custodian gets
        // the same error on a terminal entity as on a pending one.
        let result = ApprovalService::decide(
            UserRole::Custodian,
            Action::DecideReplenishment,
            ApprovalStatus::Approved,
            Decision::Rejected,
            Uuid::new_v4(),
            Some("reason".to_string()),
        );
        assert!(matches!(
            result,
            Err(WorkflowError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_parse_decision() {
        assert!(matches!(
            ApprovalService::parse_decision("approved"),
            Ok(Decision::Approved)
        ));
        assert!(matches!(
            ApprovalService::parse_decision("rejected"),
            Ok(Decision::Rejected)
        ));
        assert!(matches!(
            ApprovalService::parse_decision("pending"),
            Err(WorkflowError::InvalidDecision(_))
        ));
    }
}
