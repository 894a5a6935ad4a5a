//! Replenishment request repository.
//!
//! Creation and reads only; decisions go through the workflow repository
//! so the approval side effect stays atomic with the status change.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use cashfloat_core::ledger::{LedgerError, validate_requested_amount};
use cashfloat_shared::types::ListRange;

use crate::entities::{replenishment_requests, sea_orm_active_enums::ApprovalStatus};

/// Error types for replenishment operations.
#[derive(Debug, thiserror::Error)]
pub enum ReplenishmentError {
    /// Input failed business rule validation.
    #[error("validation failed: {0}")]
    Validation(#[from] LedgerError),

    /// Request not found.
    #[error("Replenishment request not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a replenishment request.
#[derive(Debug, Clone)]
pub struct NewReplenishmentRequest {
    /// Requested cash injection; must be strictly positive.
    pub requested_amount: Decimal,
    /// Why the float needs topping up.
    pub reason: String,
}

/// Replenishment request repository.
#[derive(Debug, Clone)]
pub struct ReplenishmentRepository {
    db: DatabaseConnection,
}

impl ReplenishmentRepository {
    /// Creates a new replenishment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a new replenishment request in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a valid positive 2-dp decimal
    /// or the insert fails.
    pub async fn create(
        &self,
        input: NewReplenishmentRequest,
        requested_by: Uuid,
    ) -> Result<replenishment_requests::Model, ReplenishmentError> {
        validate_requested_amount(input.requested_amount)?;
        if input.reason.trim().is_empty() {
            return Err(ReplenishmentError::Validation(
                LedgerError::MissingDescription,
            ));
        }

        let now = Utc::now().into();
        let model = replenishment_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            requested_amount: Set(input.requested_amount),
            reason: Set(input.reason),
            status: Set(ApprovalStatus::Pending),
            requested_by: Set(requested_by),
            approved_by: Set(None),
            approved_at: Set(None),
            comments: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a request by ID.
    ///
    /// # Errors
    ///
    /// Returns `ReplenishmentError::NotFound` if no such request exists.
    pub async fn find_by_id(
        &self,
        request_id: Uuid,
    ) -> Result<replenishment_requests::Model, ReplenishmentError> {
        replenishment_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or(ReplenishmentError::NotFound(request_id))
    }

    /// Lists requests newest-first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        status: Option<ApprovalStatus>,
        range: ListRange,
    ) -> Result<Vec<replenishment_requests::Model>, ReplenishmentError> {
        let mut query = replenishment_requests::Entity::find();

        if let Some(status) = status {
            query = query.filter(replenishment_requests::Column::Status.eq(status));
        }

        let rows = query
            .order_by_desc(replenishment_requests::Column::CreatedAt)
            .limit(range.clamped_limit())
            .offset(range.offset)
            .all(&self.db)
            .await?;

        Ok(rows)
    }
}
