//! Transaction routes: submission, listing, stats, and decisions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::{error_response, internal_error_response};
use crate::AppState;

use cashfloat_core::ledger::{LedgerStats, NewTransaction, PaymentMethod, ReceiptRef};
use cashfloat_core::workflow::{ApprovalService, UserRole, WorkflowError};
use cashfloat_db::entities::sea_orm_active_enums::{
    ApprovalStatus as DbStatus, PaymentMethod as DbPaymentMethod,
};
use cashfloat_db::entities::transactions;
use cashfloat_db::repositories::transaction::{TransactionError, TransactionFilter};
use cashfloat_db::{TransactionRepository, WorkflowRepository};
use cashfloat_shared::types::{ListRange, format_amount, parse_amount};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/stats", get(transaction_stats))
        .route("/transactions/{transaction_id}", get(get_transaction))
        .route(
            "/transactions/{transaction_id}/status",
            patch(decide_transaction),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

impl ListTransactionsQuery {
    /// Builds the limit/offset window, applying defaults.
    fn range(&self) -> ListRange {
        let defaults = ListRange::default();
        ListRange {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
        }
    }
}

/// Request body for submitting a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Transaction date (RFC 3339).
    pub date: DateTime<Utc>,
    /// Description.
    pub description: String,
    /// Signed amount as a decimal string (negative = expense).
    pub amount: String,
    /// Who received the cash or paid it in.
    pub received_by: String,
    /// Payment method: "cash", "check", or "card".
    pub payment_method: String,
    /// Opaque receipt URL from the upload layer.
    pub receipt_url: Option<String>,
    /// Original receipt file name.
    pub receipt_file_name: Option<String>,
}

/// Request body for deciding a pending transaction.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    /// Target status: "approved" or "rejected".
    pub status: String,
    /// Approver notes; required when rejecting.
    pub comments: Option<String>,
}

/// Response for a transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Transaction date.
    pub date: String,
    /// Description.
    pub description: String,
    /// Signed amount.
    pub amount: String,
    /// Who received the cash.
    pub received_by: String,
    /// Payment method.
    pub payment_method: String,
    /// Receipt URL, if attached.
    pub receipt_url: Option<String>,
    /// Receipt file name, if attached.
    pub receipt_file_name: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Submitting user ID.
    pub submitted_by: Uuid,
    /// Deciding user ID, once decided.
    pub approved_by: Option<Uuid>,
    /// Decision timestamp, once decided.
    pub approved_at: Option<String>,
    /// Decision comments.
    pub comments: Option<String>,
    /// Running balance snapshot, present once approved.
    pub running_balance: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for ledger stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Latest approved running balance.
    pub current_balance: String,
    /// Approved expenses in the current month.
    pub monthly_total: String,
    /// Transactions awaiting a decision.
    pub pending_count: u64,
    /// Average absolute approved amount.
    pub average_transaction: String,
    /// Number of approved transactions.
    pub total_transactions: u64,
}

impl From<LedgerStats> for StatsResponse {
    fn from(stats: LedgerStats) -> Self {
        Self {
            current_balance: format_amount(stats.current_balance),
            monthly_total: format_amount(stats.monthly_total),
            pending_count: stats.pending_count,
            average_transaction: format_amount(stats.average_transaction),
            total_transactions: stats.total_transactions,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List transactions with filters.
///
/// Custodians only see their own submissions; accountants and admins see
/// everything.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> Response {
    let role = match require_role(&auth) {
        Ok(role) => role,
        Err(response) => return response,
    };

    let submitted_by = if role.allows(cashfloat_core::workflow::Action::ViewAllTransactions) {
        None
    } else {
        Some(auth.user_id())
    };

    let filter = TransactionFilter {
        status: query.status.as_deref().and_then(string_to_status),
        submitted_by,
        range: query.range(),
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.list(filter).await {
        Ok(rows) => {
            let items: Vec<TransactionResponse> = rows.into_iter().map(to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            internal_error_response()
        }
    }
}

/// POST `/transactions` - Submit a new transaction.
///
/// The transaction starts pending; no running balance is assigned until an
/// approver decides it.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> Response {
    let amount = match parse_amount(&payload.amount) {
        Ok(amount) => amount,
        Err(e) => {
            return error_response(400, "invalid_amount", &e.to_string());
        }
    };

    let Some(payment_method) = PaymentMethod::parse(&payload.payment_method) else {
        return error_response(
            400,
            "invalid_payment_method",
            "Payment method must be cash, check, or card",
        );
    };

    let receipt = match (payload.receipt_url, payload.receipt_file_name) {
        (Some(url), Some(file_name)) => Some(ReceiptRef { url, file_name }),
        (None, None) => None,
        _ => {
            return error_response(
                400,
                "incomplete_receipt",
                "Receipt URL and file name must be provided together",
            );
        }
    };

    let input = NewTransaction {
        date: payload.date,
        description: payload.description,
        amount,
        received_by: payload.received_by,
        payment_method,
        receipt,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.create(input, auth.user_id()).await {
        Ok(model) => (StatusCode::CREATED, Json(to_response(model))).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// GET `/transactions/stats` - Ledger dashboard stats.
async fn transaction_stats(State(state): State<AppState>, _auth: AuthUser) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.stats().await {
        Ok(stats) => (StatusCode::OK, Json(StatsResponse::from(stats))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute transaction stats");
            internal_error_response()
        }
    }
}

/// GET `/transactions/{transaction_id}` - Get a single transaction.
async fn get_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
) -> Response {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.find_by_id(transaction_id).await {
        Ok(model) => (StatusCode::OK, Json(to_response(model))).into_response(),
        Err(e) => transaction_error_response(&e),
    }
}

/// PATCH `/transactions/{transaction_id}/status` - Approve or reject.
async fn decide_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<DecideRequest>,
) -> Response {
    let role = match require_role(&auth) {
        Ok(role) => role,
        Err(response) => return response,
    };

    let decision = match ApprovalService::parse_decision(&payload.status) {
        Ok(decision) => decision,
        Err(e) => return workflow_error_response(&e),
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo
        .decide_transaction(
            transaction_id,
            role,
            auth.user_id(),
            decision,
            payload.comments,
        )
        .await
    {
        Ok(model) => (StatusCode::OK, Json(to_response(model))).into_response(),
        Err(e) => workflow_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses the actor's role out of the validated claims.
pub(crate) fn require_role(auth: &AuthUser) -> Result<UserRole, Response> {
    UserRole::parse(auth.role()).ok_or_else(|| {
        error_response(
            401,
            "invalid_role",
            "Token carries an unknown role",
        )
    })
}

/// Maps a workflow error onto its HTTP response.
pub(crate) fn workflow_error_response(err: &WorkflowError) -> Response {
    if let WorkflowError::Database(e) = err {
        error!(error = %e, "Workflow database error");
        return internal_error_response();
    }
    error_response(err.status_code(), err.error_code(), &err.to_string())
}

/// Maps a transaction repository error onto its HTTP response.
fn transaction_error_response(err: &TransactionError) -> Response {
    match err {
        TransactionError::Validation(e) => {
            error_response(e.status_code(), e.error_code(), &e.to_string())
        }
        TransactionError::NotFound(_) => {
            error_response(404, "transaction_not_found", &err.to_string())
        }
        TransactionError::Database(e) => {
            error!(error = %e, "Transaction database error");
            internal_error_response()
        }
    }
}

/// Parses a status filter string into the database enum.
pub(crate) fn string_to_status(s: &str) -> Option<DbStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(DbStatus::Pending),
        "approved" => Some(DbStatus::Approved),
        "rejected" => Some(DbStatus::Rejected),
        _ => None,
    }
}

/// Renders a database status for responses.
pub(crate) const fn status_to_string(status: &DbStatus) -> &'static str {
    match status {
        DbStatus::Pending => "pending",
        DbStatus::Approved => "approved",
        DbStatus::Rejected => "rejected",
    }
}

/// Renders a database payment method for responses.
pub(crate) const fn payment_method_to_string(method: &DbPaymentMethod) -> &'static str {
    match method {
        DbPaymentMethod::Cash => "cash",
        DbPaymentMethod::Check => "check",
        DbPaymentMethod::Card => "card",
    }
}

/// Converts a transaction model into its API response.
pub(crate) fn to_response(model: transactions::Model) -> TransactionResponse {
    TransactionResponse {
        id: model.id,
        date: model.date.to_rfc3339(),
        description: model.description,
        amount: format_amount(model.amount),
        received_by: model.received_by,
        payment_method: payment_method_to_string(&model.payment_method).to_string(),
        receipt_url: model.receipt_url,
        receipt_file_name: model.receipt_file_name,
        status: status_to_string(&model.status).to_string(),
        submitted_by: model.submitted_by,
        approved_by: model.approved_by,
        approved_at: model.approved_at.map(|t| t.to_rfc3339()),
        comments: model.comments,
        running_balance: model.running_balance.map(format_amount),
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_status() {
        assert_eq!(string_to_status("pending"), Some(DbStatus::Pending));
        assert_eq!(string_to_status("APPROVED"), Some(DbStatus::Approved));
        assert_eq!(string_to_status("rejected"), Some(DbStatus::Rejected));
        assert_eq!(string_to_status("draft"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [DbStatus::Pending, DbStatus::Approved, DbStatus::Rejected] {
            assert_eq!(string_to_status(status_to_string(&status)), Some(status));
        }
    }
}
