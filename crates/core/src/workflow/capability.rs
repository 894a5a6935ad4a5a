//! Role capability checks.
//!
//! Every permission decision in the service goes through the single
//! [`UserRole::allows`] table below rather than per-endpoint conditionals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflow::error::WorkflowError;

/// User role in the petty-cash workflow.
///
/// Roles are ordered from lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Submits transactions and requests but never decides them.
    Custodian = 0,
    /// Approves or rejects pending entities.
    Accountant = 1,
    /// Everything an accountant can do, plus user and settings management.
    Admin = 2,
}

impl UserRole {
    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "custodian" => Some(Self::Custodian),
            "accountant" => Some(Self::Accountant),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Custodian => "custodian",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
        }
    }

    /// Returns true if this role may perform the given action.
    #[must_use]
    pub const fn allows(&self, action: Action) -> bool {
        match action {
            Action::SubmitTransaction | Action::RequestReplenishment => true,
            Action::DecideTransaction
            | Action::DecideReplenishment
            | Action::ViewAllTransactions
            | Action::ExportTransactions => {
                matches!(self, Self::Accountant | Self::Admin)
            }
            Action::ManageUsers | Action::ManageSettings => matches!(self, Self::Admin),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Submit a petty-cash transaction.
    SubmitTransaction,
    /// Request a cash-float replenishment.
    RequestReplenishment,
    /// Approve or reject a pending transaction.
    DecideTransaction,
    /// Approve or reject a pending replenishment request.
    DecideReplenishment,
    /// See transactions submitted by other users.
    ViewAllTransactions,
    /// Export the transaction log.
    ExportTransactions,
    /// List users and change their roles.
    ManageUsers,
    /// Read and write configuration settings.
    ManageSettings,
}

impl Action {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitTransaction => "submit_transaction",
            Self::RequestReplenishment => "request_replenishment",
            Self::DecideTransaction => "decide_transaction",
            Self::DecideReplenishment => "decide_replenishment",
            Self::ViewAllTransactions => "view_all_transactions",
            Self::ExportTransactions => "export_transactions",
            Self::ManageUsers => "manage_users",
            Self::ManageSettings => "manage_settings",
        }
    }
}

/// Checks that a role may perform an action.
///
/// # Errors
///
/// Returns `WorkflowError::PermissionDenied` when the capability table
/// does not allow the action for the role.
pub fn authorize(role: UserRole, action: Action) -> Result<(), WorkflowError> {
    if role.allows(action) {
        Ok(())
    } else {
        Err(WorkflowError::PermissionDenied {
            role: role.as_str().to_string(),
            action: action.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("custodian"), Some(UserRole::Custodian));
        assert_eq!(UserRole::parse("ACCOUNTANT"), Some(UserRole::Accountant));
        assert_eq!(UserRole::parse("Admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("viewer"), None);
    }

    #[test]
    fn test_role_ordering() {
        assert!(UserRole::Custodian < UserRole::Accountant);
        assert!(UserRole::Accountant < UserRole::Admin);
    }

    #[test]
    fn test_everyone_can_submit() {
        for role in [UserRole::Custodian, UserRole::Accountant, UserRole::Admin] {
            assert!(role.allows(Action::SubmitTransaction));
            assert!(role.allows(Action::RequestReplenishment));
        }
    }

    #[test]
    fn test_custodian_never_decides() {
        assert!(!UserRole::Custodian.allows(Action::DecideTransaction));
        assert!(!UserRole::Custodian.allows(Action::DecideReplenishment));
        assert!(UserRole::Accountant.allows(Action::DecideTransaction));
        assert!(UserRole::Admin.allows(Action::DecideReplenishment));
    }

    #[test]
    fn test_only_admin_manages_users_and_settings() {
        assert!(!UserRole::Custodian.allows(Action::ManageUsers));
        assert!(!UserRole::Accountant.allows(Action::ManageUsers));
        assert!(UserRole::Admin.allows(Action::ManageUsers));

        assert!(!UserRole::Accountant.allows(Action::ManageSettings));
        assert!(UserRole::Admin.allows(Action::ManageSettings));
    }

    #[test]
    fn test_authorize_maps_to_permission_denied() {
        let result = authorize(UserRole::Custodian, Action::DecideTransaction);
        assert!(matches!(
            result,
            Err(WorkflowError::PermissionDenied { .. })
        ));

        assert!(authorize(UserRole::Accountant, Action::DecideTransaction).is_ok());
    }
}
