//! CSV export of the transaction log.
//!
//! Pure projection over the ledger's read operations; no core logic here.

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::middleware::AuthUser;
use crate::routes::transactions::{
    payment_method_to_string, require_role, status_to_string, string_to_status,
};
use crate::routes::{error_response, internal_error_response};

use cashfloat_core::workflow::{Action, authorize};
use cashfloat_db::entities::{transactions, users};
use cashfloat_db::{TransactionRepository, UserRepository};
use cashfloat_shared::types::format_amount;

/// Creates the export routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/export/transactions", get(export_transactions))
}

/// Query parameters for the CSV export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Include only transactions dated on or after this day.
    pub start_date: Option<NaiveDate>,
    /// Include only transactions dated on or before this day.
    pub end_date: Option<NaiveDate>,
}

/// GET `/export/transactions` - Download the transaction log as CSV.
async fn export_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ExportQuery>,
) -> Response {
    let role = match require_role(&auth) {
        Ok(role) => role,
        Err(response) => return response,
    };
    if let Err(e) = authorize(role, Action::ExportTransactions) {
        return error_response(e.status_code(), e.error_code(), &e.to_string());
    }

    let tx_repo = TransactionRepository::new((*state.db).clone());
    let rows = match tx_repo
        .list_all(query.status.as_deref().and_then(string_to_status))
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load transactions for export");
            return internal_error_response();
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let submitters = match user_repo.list().await {
        Ok(users) => users
            .into_iter()
            .map(|u| (u.id, display_name(&u)))
            .collect::<HashMap<Uuid, String>>(),
        Err(e) => {
            error!(error = %e, "Failed to load users for export");
            return internal_error_response();
        }
    };

    let filtered = rows.into_iter().filter(|t| {
        let day = t.date.date_naive();
        if let Some(start) = query.start_date
            && day < start
        {
            return false;
        }
        if let Some(end) = query.end_date
            && day > end
        {
            return false;
        }
        true
    });

    let csv = render_csv(filtered, &submitters);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=transactions.csv",
            ),
        ],
        csv,
    )
        .into_response()
}

/// Renders transactions as CSV, newest first.
fn render_csv<I>(rows: I, submitters: &HashMap<Uuid, String>) -> String
where
    I: Iterator<Item = transactions::Model>,
{
    let mut lines = vec![
        "Date,Description,Amount,Received By,Payment Method,Status,Balance,Submitted By"
            .to_string(),
    ];

    for t in rows {
        let submitter = submitters
            .get(&t.submitted_by)
            .cloned()
            .unwrap_or_default();
        lines.push(
            [
                t.date.date_naive().to_string(),
                csv_field(&t.description),
                format_amount(t.amount),
                csv_field(&t.received_by),
                payment_method_to_string(&t.payment_method).to_string(),
                status_to_string(&t.status).to_string(),
                t.running_balance.map(format_amount).unwrap_or_default(),
                csv_field(&submitter),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Quotes a free-text CSV field, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Best-effort display name for a user.
fn display_name(user: &users::Model) -> String {
    match (&user.first_name, &user.last_name) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.clone(),
        (None, Some(last)) => last.clone(),
        (None, None) => user.email.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_escapes_quotes() {
        assert_eq!(csv_field("plain"), "\"plain\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_header_row() {
        let csv = render_csv(std::iter::empty(), &HashMap::new());
        assert_eq!(
            csv,
            "Date,Description,Amount,Received By,Payment Method,Status,Balance,Submitted By"
        );
    }
}
