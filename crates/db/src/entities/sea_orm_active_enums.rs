//! `SeaORM` active enums mapped to the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role in the petty-cash workflow.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Submits transactions and requests but never decides them.
    #[sea_orm(string_value = "custodian")]
    Custodian,
    /// Approves or rejects pending entities.
    #[sea_orm(string_value = "accountant")]
    Accountant,
    /// Full access including user and settings management.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Lifecycle status shared by transactions and replenishment requests.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved (terminal).
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected (terminal).
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// How a petty-cash movement was paid out.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash from the float.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Check drawn against the float account.
    #[sea_orm(string_value = "check")]
    Check,
    /// Company card.
    #[sea_orm(string_value = "card")]
    Card,
}
