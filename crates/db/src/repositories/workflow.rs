//! Workflow repository for approval state transitions.
//!
//! Applies the decisions validated by the core approval service. Both
//! decide paths run inside one database transaction holding the ledger
//! append lock, so a decision and the ledger append it triggers are one
//! atomic unit.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use cashfloat_core::ledger::RunningBalance;
use cashfloat_core::workflow::{
    Action, ApprovalService, Decision, DecisionAction, UserRole, WorkflowError,
    replenishment_credit,
};

use crate::entities::{replenishment_requests, sea_orm_active_enums::ApprovalStatus, transactions};

use super::transaction::{
    acquire_append_lock, insert_with_balance, latest_approved_balance, status_to_core,
};

/// Result of deciding a replenishment request.
#[derive(Debug, Clone)]
pub struct ReplenishmentDecision {
    /// The decided request.
    pub request: replenishment_requests::Model,
    /// The credit transaction created on approval, if any.
    pub credit: Option<transactions::Model>,
}

/// Workflow repository for approval transitions.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Approves or rejects a pending transaction.
    ///
    /// On approval the transaction receives its running balance, extending
    /// the chain from the latest approved entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transaction is not found
    /// - The transaction is already decided
    /// - The actor's role may not decide
    /// - A rejection is missing its comment
    /// - A database operation fails
    pub async fn decide_transaction(
        &self,
        transaction_id: Uuid,
        actor_role: UserRole,
        decided_by: Uuid,
        decision: Decision,
        comments: Option<String>,
    ) -> Result<transactions::Model, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        // Serialize against other appends before reading any state.
        acquire_append_lock(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::TransactionNotFound(transaction_id))?;

        let current_status = status_to_core(&transaction.status);

        // Validate the transition (role, terminal state, comment rules).
        let action = ApprovalService::decide(
            actor_role,
            Action::DecideTransaction,
            current_status,
            decision,
            decided_by,
            comments,
        )?;

        let amount = transaction.amount;
        let now = action.decided_at().into();
        let mut active: transactions::ActiveModel = transaction.into();

        match &action {
            DecisionAction::Approve { comments, .. } => {
                let latest = latest_approved_balance(&txn)
                    .await
                    .map_err(|e| WorkflowError::Database(e.to_string()))?;
                let balance = RunningBalance::from_latest(latest, amount);

                active.status = Set(ApprovalStatus::Approved);
                active.running_balance = Set(Some(balance.current_balance));
                active.comments = Set(comments.clone());
            }
            DecisionAction::Reject { comments, .. } => {
                active.status = Set(ApprovalStatus::Rejected);
                active.comments = Set(Some(comments.clone()));
            }
        }

        active.approved_by = Set(Some(decided_by));
        active.approved_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        info!(
            transaction_id = %transaction_id,
            status = ?updated.status,
            decided_by = %decided_by,
            "transaction decided"
        );

        Ok(updated)
    }

    /// Approves or rejects a pending replenishment request.
    ///
    /// Approval additionally appends exactly one credit transaction to the
    /// ledger, attributed to the approving actor, in the same database
    /// transaction as the status update.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request is not found
    /// - The request is already decided
    /// - The actor's role may not decide
    /// - A rejection is missing its comment
    /// - A database operation fails
    pub async fn decide_replenishment(
        &self,
        request_id: Uuid,
        actor_role: UserRole,
        decided_by: Uuid,
        decision: Decision,
        comments: Option<String>,
    ) -> Result<ReplenishmentDecision, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        acquire_append_lock(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let request = replenishment_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::RequestNotFound(request_id))?;

        let current_status = status_to_core(&request.status);

        let action = ApprovalService::decide(
            actor_role,
            Action::DecideReplenishment,
            current_status,
            decision,
            decided_by,
            comments,
        )?;

        let reason = request.reason.clone();
        let requested_amount = request.requested_amount;
        let now = action.decided_at().into();
        let mut active: replenishment_requests::ActiveModel = request.into();

        match &action {
            DecisionAction::Approve { comments, .. } => {
                active.status = Set(ApprovalStatus::Approved);
                active.comments = Set(comments.clone());
            }
            DecisionAction::Reject { comments, .. } => {
                active.status = Set(ApprovalStatus::Rejected);
                active.comments = Set(Some(comments.clone()));
            }
        }

        active.approved_by = Set(Some(decided_by));
        active.approved_at = Set(Some(now));
        active.updated_at = Set(now);

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        // Approval injects the cash: one derived credit per request.
        let credit = if matches!(action, DecisionAction::Approve { .. }) {
            let input = replenishment_credit(&reason, requested_amount, action.decided_at());
            let credit = insert_with_balance(&txn, &input, decided_by, decided_by)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;
            Some(credit)
        } else {
            None
        };

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        info!(
            request_id = %request_id,
            status = ?updated.status,
            decided_by = %decided_by,
            credited = credit.is_some(),
            "replenishment decided"
        );

        Ok(ReplenishmentDecision {
            request: updated,
            credit,
        })
    }
}
