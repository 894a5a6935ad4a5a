//! Replenishment request routes: submission, listing, and decisions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::transactions::{
    TransactionResponse, require_role, status_to_string, string_to_status, to_response,
    workflow_error_response,
};
use crate::routes::{error_response, internal_error_response};
use crate::AppState;

use cashfloat_core::workflow::ApprovalService;
use cashfloat_db::entities::replenishment_requests;
use cashfloat_db::repositories::replenishment::{NewReplenishmentRequest, ReplenishmentError};
use cashfloat_db::{ReplenishmentRepository, WorkflowRepository};
use cashfloat_shared::types::{ListRange, format_amount, parse_amount};

/// Creates the replenishment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/replenishments",
            get(list_replenishments).post(create_replenishment),
        )
        .route(
            "/replenishments/{request_id}/status",
            patch(decide_replenishment),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing replenishment requests.
#[derive(Debug, Deserialize)]
pub struct ListReplenishmentsQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
    /// Number of rows to skip.
    pub offset: Option<u64>,
}

/// Request body for submitting a replenishment request.
#[derive(Debug, Deserialize)]
pub struct CreateReplenishmentRequest {
    /// Requested amount as a positive decimal string.
    pub requested_amount: String,
    /// Why the float needs topping up.
    pub reason: String,
}

/// Request body for deciding a pending request.
#[derive(Debug, Deserialize)]
pub struct DecideReplenishmentRequest {
    /// Target status: "approved" or "rejected".
    pub status: String,
    /// Approver notes; required when rejecting.
    pub comments: Option<String>,
}

/// Response for a replenishment request.
#[derive(Debug, Serialize)]
pub struct ReplenishmentResponse {
    /// Request ID.
    pub id: Uuid,
    /// Requested amount.
    pub requested_amount: String,
    /// Reason for the request.
    pub reason: String,
    /// Lifecycle status.
    pub status: String,
    /// Requesting user ID.
    pub requested_by: Uuid,
    /// Deciding user ID, once decided.
    pub approved_by: Option<Uuid>,
    /// Decision timestamp, once decided.
    pub approved_at: Option<String>,
    /// Decision comments.
    pub comments: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

/// Response for a decided request, including the credit it produced.
#[derive(Debug, Serialize)]
pub struct ReplenishmentDecisionResponse {
    /// The decided request.
    pub request: ReplenishmentResponse,
    /// The ledger credit created on approval, if any.
    pub credit: Option<TransactionResponse>,
}

fn request_to_response(model: replenishment_requests::Model) -> ReplenishmentResponse {
    ReplenishmentResponse {
        id: model.id,
        requested_amount: format_amount(model.requested_amount),
        reason: model.reason,
        status: status_to_string(&model.status).to_string(),
        requested_by: model.requested_by,
        approved_by: model.approved_by,
        approved_at: model.approved_at.map(|t| t.to_rfc3339()),
        comments: model.comments,
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/replenishments` - List replenishment requests.
async fn list_replenishments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListReplenishmentsQuery>,
) -> Response {
    let defaults = ListRange::default();
    let range = ListRange {
        limit: query.limit.unwrap_or(defaults.limit),
        offset: query.offset.unwrap_or(defaults.offset),
    };

    let repo = ReplenishmentRepository::new((*state.db).clone());
    match repo
        .list(query.status.as_deref().and_then(string_to_status), range)
        .await
    {
        Ok(rows) => {
            let items: Vec<ReplenishmentResponse> =
                rows.into_iter().map(request_to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list replenishment requests");
            internal_error_response()
        }
    }
}

/// POST `/replenishments` - Submit a new replenishment request.
async fn create_replenishment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateReplenishmentRequest>,
) -> Response {
    let requested_amount = match parse_amount(&payload.requested_amount) {
        Ok(amount) => amount,
        Err(e) => {
            return error_response(400, "invalid_amount", &e.to_string());
        }
    };

    let input = NewReplenishmentRequest {
        requested_amount,
        reason: payload.reason,
    };

    let repo = ReplenishmentRepository::new((*state.db).clone());
    match repo.create(input, auth.user_id()).await {
        Ok(model) => (StatusCode::CREATED, Json(request_to_response(model))).into_response(),
        Err(e) => replenishment_error_response(&e),
    }
}

/// PATCH `/replenishments/{request_id}/status` - Approve or reject.
///
/// Approval additionally appends the derived credit to the ledger; the
/// response carries both the decided request and the credit.
async fn decide_replenishment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<DecideReplenishmentRequest>,
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
        .decide_replenishment(request_id, role, auth.user_id(), decision, payload.comments)
        .await
    {
        Ok(outcome) => {
            let body = ReplenishmentDecisionResponse {
                request: request_to_response(outcome.request),
                credit: outcome.credit.map(to_response),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Maps a replenishment repository error onto its HTTP response.
fn replenishment_error_response(err: &ReplenishmentError) -> Response {
    match err {
        ReplenishmentError::Validation(e) => {
            error_response(e.status_code(), e.error_code(), &e.to_string())
        }
        ReplenishmentError::NotFound(_) => {
            error_response(404, "request_not_found", &err.to_string())
        }
        ReplenishmentError::Database(e) => {
            error!(error = %e, "Replenishment database error");
            internal_error_response()
        }
    }
}
