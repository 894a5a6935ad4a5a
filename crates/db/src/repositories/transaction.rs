//! Transaction repository: the running-balance ledger engine.
//!
//! Every balance-affecting write funnels through
//! [`insert_with_balance`] / the workflow repository's approval path, which
//! read the latest approved balance and insert inside one database
//! transaction. A Postgres advisory transaction lock serializes the
//! read-modify-write so concurrent appends cannot compute two entries from
//! the same basis.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    Statement,
};
use uuid::Uuid;

use cashfloat_core::ledger::{
    LedgerError, LedgerStats, NewTransaction, RunningBalance, month_start, project_stats,
    validate_new_transaction,
};
use cashfloat_shared::types::ListRange;

use crate::entities::{
    sea_orm_active_enums::{ApprovalStatus, PaymentMethod},
    transactions,
};

/// Advisory lock key serializing ledger appends.
///
/// Held for the duration of the enclosing database transaction
/// (`pg_advisory_xact_lock`), so the latest-balance read and the insert
/// that depends on it form one critical section.
const LEDGER_APPEND_LOCK: i64 = 815_551_207;

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Input failed business rule validation.
    #[error("validation failed: {0}")]
    Validation(#[from] LedgerError),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by status.
    pub status: Option<ApprovalStatus>,
    /// Filter by submitting user (custodians see only their own).
    pub submitted_by: Option<Uuid>,
    /// Limit/offset window.
    pub range: ListRange,
}

/// Transaction repository for ledger reads and submissions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a new transaction in `pending` status.
    ///
    /// No running balance is assigned here; the balance chain is extended
    /// only when the transaction is approved.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the insert fails. Validation
    /// runs before any persistence, so a rejected submission leaves no
    /// partial state.
    pub async fn create(
        &self,
        input: NewTransaction,
        submitted_by: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        validate_new_transaction(&input)?;

        let now = Utc::now().into();
        let (receipt_url, receipt_file_name) = match &input.receipt {
            Some(receipt) => (Some(receipt.url.clone()), Some(receipt.file_name.clone())),
            None => (None, None),
        };

        let model = transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(input.date.into()),
            description: Set(input.description),
            amount: Set(input.amount),
            received_by: Set(input.received_by),
            payment_method: Set(payment_method_to_db(input.payment_method)),
            receipt_url: Set(receipt_url),
            receipt_file_name: Set(receipt_file_name),
            status: Set(ApprovalStatus::Pending),
            submitted_by: Set(submitted_by),
            approved_by: Set(None),
            approved_at: Set(None),
            comments: Set(None),
            running_balance: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if no such transaction exists.
    pub async fn find_by_id(
        &self,
        transaction_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(transaction_id))
    }

    /// Lists transactions newest-first with optional filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(status));
        }
        if let Some(user_id) = filter.submitted_by {
            query = query.filter(transactions::Column::SubmittedBy.eq(user_id));
        }

        let rows = query
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(filter.range.clamped_limit())
            .offset(filter.range.offset)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Lists every transaction newest-first, optionally filtered by status.
    ///
    /// Unpaginated read for report/export projections.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find();

        if let Some(status) = status {
            query = query.filter(transactions::Column::Status.eq(status));
        }

        Ok(query
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Returns the running balance of the latest approved entry, or 0 for
    /// an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn current_balance(&self) -> Result<Decimal, TransactionError> {
        Ok(latest_approved_balance(&self.db)
            .await?
            .unwrap_or(Decimal::ZERO))
    }

    /// Computes dashboard stats over the ledger.
    ///
    /// Monetary figures cover the approved subset; `pending_count` scans
    /// the pending subset. Reads are weakly consistent with in-flight
    /// appends.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn stats(&self) -> Result<LedgerStats, TransactionError> {
        let current_balance = self.current_balance().await?;

        let approved_rows: Vec<(Decimal, sea_orm::prelude::DateTimeWithTimeZone)> =
            transactions::Entity::find()
                .filter(transactions::Column::Status.eq(ApprovalStatus::Approved))
                .select_only()
                .column(transactions::Column::Amount)
                .column(transactions::Column::Date)
                .into_tuple()
                .all(&self.db)
                .await?;

        let approved: Vec<_> = approved_rows
            .into_iter()
            .map(|(amount, date)| (amount, date.with_timezone(&Utc)))
            .collect();

        let pending_count = transactions::Entity::find()
            .filter(transactions::Column::Status.eq(ApprovalStatus::Pending))
            .count(&self.db)
            .await?;

        Ok(project_stats(
            current_balance,
            &approved,
            pending_count,
            month_start(Utc::now()),
        ))
    }
}

// ============================================================================
// Append primitives (shared with the workflow repository)
// ============================================================================

/// Takes the advisory lock that serializes ledger appends.
///
/// Must be called inside a database transaction; the lock is released on
/// commit or rollback.
pub(crate) async fn acquire_append_lock(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock($1)",
        [LEDGER_APPEND_LOCK.into()],
    ))
    .await?;
    Ok(())
}

/// Reads the running balance of the latest approved entry.
///
/// Ordered by approval time so backdated transaction dates never reorder
/// the chain. Returns `None` for an empty ledger.
pub(crate) async fn latest_approved_balance<C: ConnectionTrait>(
    conn: &C,
) -> Result<Option<Decimal>, DbErr> {
    let latest = transactions::Entity::find()
        .filter(transactions::Column::Status.eq(ApprovalStatus::Approved))
        .order_by_desc(transactions::Column::ApprovedAt)
        .order_by_desc(transactions::Column::UpdatedAt)
        .limit(1)
        .one(conn)
        .await?;

    Ok(latest.and_then(|t| t.running_balance))
}

/// Inserts an already-approved transaction with its running balance.
///
/// This is the atomic read-latest-balance-then-insert primitive. The
/// caller must hold the append lock (see [`acquire_append_lock`]) within
/// the same database transaction.
pub(crate) async fn insert_with_balance(
    txn: &DatabaseTransaction,
    input: &NewTransaction,
    submitted_by: Uuid,
    approved_by: Uuid,
) -> Result<transactions::Model, DbErr> {
    let latest = latest_approved_balance(txn).await?;
    let balance = RunningBalance::from_latest(latest, input.amount);

    let now = Utc::now().into();
    let (receipt_url, receipt_file_name) = match &input.receipt {
        Some(receipt) => (Some(receipt.url.clone()), Some(receipt.file_name.clone())),
        None => (None, None),
    };

    let model = transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        date: Set(input.date.into()),
        description: Set(input.description.clone()),
        amount: Set(input.amount),
        received_by: Set(input.received_by.clone()),
        payment_method: Set(payment_method_to_db(input.payment_method)),
        receipt_url: Set(receipt_url),
        receipt_file_name: Set(receipt_file_name),
        status: Set(ApprovalStatus::Approved),
        submitted_by: Set(submitted_by),
        approved_by: Set(Some(approved_by)),
        approved_at: Set(Some(now)),
        comments: Set(None),
        running_balance: Set(Some(balance.current_balance)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    model.insert(txn).await
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts a core payment method to its database enum.
pub(crate) const fn payment_method_to_db(
    method: cashfloat_core::ledger::PaymentMethod,
) -> PaymentMethod {
    match method {
        cashfloat_core::ledger::PaymentMethod::Cash => PaymentMethod::Cash,
        cashfloat_core::ledger::PaymentMethod::Check => PaymentMethod::Check,
        cashfloat_core::ledger::PaymentMethod::Card => PaymentMethod::Card,
    }
}

/// Converts a database status to the core status.
pub(crate) const fn status_to_core(
    status: &ApprovalStatus,
) -> cashfloat_core::workflow::ApprovalStatus {
    match status {
        ApprovalStatus::Pending => cashfloat_core::workflow::ApprovalStatus::Pending,
        ApprovalStatus::Approved => cashfloat_core::workflow::ApprovalStatus::Approved,
        ApprovalStatus::Rejected => cashfloat_core::workflow::ApprovalStatus::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashfloat_core::ledger::PaymentMethod as CorePaymentMethod;
    use cashfloat_core::workflow::ApprovalStatus as CoreStatus;

    #[test]
    fn test_payment_method_conversion() {
        assert_eq!(
            payment_method_to_db(CorePaymentMethod::Cash),
            PaymentMethod::Cash
        );
        assert_eq!(
            payment_method_to_db(CorePaymentMethod::Check),
            PaymentMethod::Check
        );
        assert_eq!(
            payment_method_to_db(CorePaymentMethod::Card),
            PaymentMethod::Card
        );
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(status_to_core(&ApprovalStatus::Pending), CoreStatus::Pending);
        assert_eq!(
            status_to_core(&ApprovalStatus::Approved),
            CoreStatus::Approved
        );
        assert_eq!(
            status_to_core(&ApprovalStatus::Rejected),
            CoreStatus::Rejected
        );
    }
}
