//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, response::Response};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod export;
pub mod health;
pub mod replenishments;
pub mod settings;
pub mod transactions;
pub mod users;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(transactions::routes())
        .merge(replenishments::routes())
        .merge(users::routes())
        .merge(settings::routes())
        .merge(export::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Builds a JSON error response from an error code and message.
pub(crate) fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code.to_lowercase(),
            "message": message
        })),
    )
        .into_response()
}

/// Builds the opaque 500 response used when a database error occurs.
pub(crate) fn internal_error_response() -> Response {
    error_response(500, "internal_error", "An error occurred")
}
