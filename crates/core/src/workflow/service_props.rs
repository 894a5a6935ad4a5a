//! Property tests for the approval state machine.

use proptest::prelude::*;
use uuid::Uuid;

use crate::workflow::capability::{Action, UserRole};
use crate::workflow::error::WorkflowError;
use crate::workflow::service::ApprovalService;
use crate::workflow::types::{ApprovalStatus, Decision};

/// Strategy for generating any approval status.
fn status_strategy() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Pending),
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
    ]
}

/// Strategy for generating terminal statuses only.
fn terminal_status_strategy() -> impl Strategy<Value = ApprovalStatus> {
    prop_oneof![
        Just(ApprovalStatus::Approved),
        Just(ApprovalStatus::Rejected),
    ]
}

/// Strategy for generating decisions.
fn decision_strategy() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approved), Just(Decision::Rejected)]
}

/// Strategy for generating roles allowed to decide.
fn approver_role_strategy() -> impl Strategy<Value = UserRole> {
    prop_oneof![Just(UserRole::Accountant), Just(UserRole::Admin)]
}

/// Strategy for generating the decide actions.
fn decide_action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::DecideTransaction),
        Just(Action::DecideReplenishment),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A terminal entity rejects every further decision with AlreadyDecided,
    /// no matter the decision or the (authorized) role.
    #[test]
    fn prop_terminal_entities_stay_decided(
        status in terminal_status_strategy(),
        decision in decision_strategy(),
        role in approver_role_strategy(),
        action in decide_action_strategy(),
    ) {
        let result = ApprovalService::decide(
            role,
            action,
            status,
            decision,
            Uuid::new_v4(),
            Some("justification".to_string()),
        );
        prop_assert!(
            matches!(result, Err(WorkflowError::AlreadyDecided { .. })),
            "expected AlreadyDecided"
        );
    }

    /// A custodian is refused regardless of entity state or decision.
    #[test]
    fn prop_custodian_always_denied(
        status in status_strategy(),
        decision in decision_strategy(),
        action in decide_action_strategy(),
    ) {
        let result = ApprovalService::decide(
            UserRole::Custodian,
            action,
            status,
            decision,
            Uuid::new_v4(),
            Some("justification".to_string()),
        );
        prop_assert!(
            matches!(result, Err(WorkflowError::PermissionDenied { .. })),
            "expected PermissionDenied"
        );
    }

    /// Rejections without substantive comments always fail validation.
    #[test]
    fn prop_rejection_requires_comment(
        role in approver_role_strategy(),
        action in decide_action_strategy(),
        blank in "[ \t]*",
    ) {
        let missing = ApprovalService::decide(
            role, action, ApprovalStatus::Pending, Decision::Rejected, Uuid::new_v4(), None,
        );
        prop_assert!(matches!(missing, Err(WorkflowError::CommentRequired)));

        let blank_comment = ApprovalService::decide(
            role, action, ApprovalStatus::Pending, Decision::Rejected, Uuid::new_v4(), Some(blank),
        );
        prop_assert!(matches!(blank_comment, Err(WorkflowError::CommentRequired)));
    }

    /// A valid decision from pending lands on the decision's target status
    /// and records the deciding user.
    #[test]
    fn prop_valid_decision_reaches_target_status(
        role in approver_role_strategy(),
        action in decide_action_strategy(),
        decision in decision_strategy(),
    ) {
        let user_id = Uuid::new_v4();
        let result = ApprovalService::decide(
            role,
            action,
            ApprovalStatus::Pending,
            decision,
            user_id,
            Some("reviewed".to_string()),
        );

        let action = result.expect("pending decisions with comments succeed");
        prop_assert_eq!(action.new_status(), decision.target_status());
        prop_assert_eq!(action.decided_by(), user_id);
        prop_assert!(action.new_status().is_terminal());
    }
}
