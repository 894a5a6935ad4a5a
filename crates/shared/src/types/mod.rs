//! Common value types shared across crates.

pub mod amount;
pub mod pagination;

pub use amount::{AmountError, format_amount, parse_amount, validate_amount};
pub use pagination::ListRange;
