//! Approval state machine and role capabilities.
//!
//! This module governs how transactions and replenishment requests move
//! from `pending` to `approved` or `rejected`:
//! - Status and decision types
//! - The transition service with its audit actions
//! - Role capability checks (one table, consumed uniformly)
//! - Replenishment credit derivation
//! - Error types for workflow operations

pub mod capability;
pub mod error;
pub mod replenishment;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use capability::{Action, UserRole, authorize};
pub use error::WorkflowError;
pub use replenishment::{FLOAT_RECIPIENT, replenishment_credit};
pub use service::ApprovalService;
pub use types::{ApprovalStatus, Decision, DecisionAction};
