//! Running-balance ledger over petty-cash transactions.
//!
//! This module implements the core ledger functionality:
//! - Running balance chain computation
//! - Domain types for transaction submission
//! - Business rule validation
//! - Stats projections over the approved subset
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod stats;
pub mod validation;

pub use balance::RunningBalance;
pub use entry::{NewTransaction, PaymentMethod, ReceiptRef};
pub use error::LedgerError;
pub use stats::{LedgerStats, month_start, project_stats};
pub use validation::{validate_new_transaction, validate_requested_amount};
