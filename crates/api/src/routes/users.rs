//! User routes: profile, listing, and role management.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::transactions::require_role;
use crate::routes::{error_response, internal_error_response};
use crate::AppState;

use cashfloat_core::workflow::{Action, authorize};
use cashfloat_db::UserRepository;
use cashfloat_db::entities::sea_orm_active_enums::UserRole as DbUserRole;
use cashfloat_db::entities::users;
use cashfloat_db::repositories::user::UserError;

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(current_user))
        .route("/users", get(list_users))
        .route("/users/{user_id}/role", patch(update_user_role))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for changing a user's role.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role: "custodian", "accountant", or "admin".
    pub role: String,
}

/// Response for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email address.
    pub email: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Profile image URL.
    pub profile_image_url: Option<String>,
    /// Workflow role.
    pub role: String,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

fn user_to_response(model: users::Model) -> UserResponse {
    UserResponse {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        profile_image_url: model.profile_image_url,
        role: role_to_string(&model.role).to_string(),
        created_at: model.created_at.to_rfc3339(),
        updated_at: model.updated_at.to_rfc3339(),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/users/me` - The authenticated user's profile.
async fn current_user(State(state): State<AppState>, auth: AuthUser) -> Response {
    let repo = UserRepository::new((*state.db).clone());
    match repo.find_by_id(auth.user_id()).await {
        Ok(user) => (StatusCode::OK, Json(user_to_response(user))).into_response(),
        Err(e) => user_error_response(&e),
    }
}

/// GET `/users` - List all users (admin only).
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> Response {
    let role = match require_role(&auth) {
        Ok(role) => role,
        Err(response) => return response,
    };
    if let Err(e) = authorize(role, Action::ManageUsers) {
        return error_response(e.status_code(), e.error_code(), &e.to_string());
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(rows) => {
            let items: Vec<UserResponse> = rows.into_iter().map(user_to_response).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            internal_error_response()
        }
    }
}

/// PATCH `/users/{user_id}/role` - Change a user's role (admin only).
async fn update_user_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Response {
    let role = match require_role(&auth) {
        Ok(role) => role,
        Err(response) => return response,
    };
    if let Err(e) = authorize(role, Action::ManageUsers) {
        return error_response(e.status_code(), e.error_code(), &e.to_string());
    }

    let Some(new_role) = string_to_role(&payload.role) else {
        return error_response(
            400,
            "invalid_role",
            "Role must be custodian, accountant, or admin",
        );
    };

    let repo = UserRepository::new((*state.db).clone());
    match repo.update_role(user_id, new_role).await {
        Ok(user) => (StatusCode::OK, Json(user_to_response(user))).into_response(),
        Err(e) => user_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Maps a user repository error onto its HTTP response.
fn user_error_response(err: &UserError) -> Response {
    match err {
        UserError::NotFound(_) => error_response(404, "user_not_found", &err.to_string()),
        UserError::Database(e) => {
            error!(error = %e, "User database error");
            internal_error_response()
        }
    }
}

/// Parses a role string into the database enum.
fn string_to_role(s: &str) -> Option<DbUserRole> {
    match s.to_lowercase().as_str() {
        "custodian" => Some(DbUserRole::Custodian),
        "accountant" => Some(DbUserRole::Accountant),
        "admin" => Some(DbUserRole::Admin),
        _ => None,
    }
}

/// Renders a database role for responses.
const fn role_to_string(role: &DbUserRole) -> &'static str {
    match role {
        DbUserRole::Custodian => "custodian",
        DbUserRole::Accountant => "accountant",
        DbUserRole::Admin => "admin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            DbUserRole::Custodian,
            DbUserRole::Accountant,
            DbUserRole::Admin,
        ] {
            assert_eq!(string_to_role(role_to_string(&role)), Some(role));
        }
        assert_eq!(string_to_role("owner"), None);
    }
}
