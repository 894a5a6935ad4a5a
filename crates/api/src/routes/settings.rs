//! Settings routes: audited key/value configuration.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::middleware::AuthUser;
use crate::routes::transactions::require_role;
use crate::routes::{error_response, internal_error_response};
use crate::AppState;

use cashfloat_core::workflow::{Action, authorize};
use cashfloat_db::SettingRepository;

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/settings/{key}", get(get_setting).put(put_setting))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for writing a setting.
#[derive(Debug, Deserialize)]
pub struct PutSettingRequest {
    /// The new value.
    pub value: String,
}

/// Response for a setting read or write.
#[derive(Debug, Serialize)]
pub struct SettingResponse {
    /// Setting key.
    pub key: String,
    /// Setting value.
    pub value: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/settings/{key}` - Read a setting.
async fn get_setting(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(key): Path<String>,
) -> Response {
    let repo = SettingRepository::new((*state.db).clone());
    match repo.get(&key).await {
        Ok(Some(value)) => {
            (StatusCode::OK, Json(SettingResponse { key, value })).into_response()
        }
        Ok(None) => error_response(404, "setting_not_found", "No such setting"),
        Err(e) => {
            error!(error = %e, "Failed to read setting");
            internal_error_response()
        }
    }
}

/// PUT `/settings/{key}` - Write a setting (admin only).
async fn put_setting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<PutSettingRequest>,
) -> Response {
    let role = match require_role(&auth) {
        Ok(role) => role,
        Err(response) => return response,
    };
    if let Err(e) = authorize(role, Action::ManageSettings) {
        return error_response(e.status_code(), e.error_code(), &e.to_string());
    }

    let repo = SettingRepository::new((*state.db).clone());
    match repo.set(&key, &payload.value, auth.user_id()).await {
        Ok(setting) => (
            StatusCode::OK,
            Json(SettingResponse {
                key: setting.key,
                value: setting.value,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to write setting");
            internal_error_response()
        }
    }
}
