//! Read-only stats projections over the ledger.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate dashboard figures for the petty-cash float.
///
/// All monetary figures are computed over the approved subset of the
/// ledger; only `pending_count` scans the not-yet-decided subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Running balance of the latest approved entry (0 for an empty ledger).
    pub current_balance: Decimal,
    /// Total approved expenses in the current calendar month (absolute value).
    pub monthly_total: Decimal,
    /// Number of transactions still awaiting a decision.
    pub pending_count: u64,
    /// Average absolute amount across approved transactions.
    pub average_transaction: Decimal,
    /// Number of approved transactions.
    pub total_transactions: u64,
}

impl LedgerStats {
    /// Stats for an empty ledger: everything zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            current_balance: Decimal::ZERO,
            monthly_total: Decimal::ZERO,
            pending_count: 0,
            average_transaction: Decimal::ZERO,
            total_transactions: 0,
        }
    }
}

impl Default for LedgerStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Returns midnight UTC on the first day of `now`'s month.
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Projects ledger stats from the approved entries and pending count.
///
/// `approved` holds `(amount, date)` pairs for every approved transaction;
/// `current_balance` is the latest approved running balance. Expenses are
/// the negative amounts; `monthly_total` counts only those dated on or
/// after `month_start`.
#[must_use]
pub fn project_stats(
    current_balance: Decimal,
    approved: &[(Decimal, DateTime<Utc>)],
    pending_count: u64,
    month_start: DateTime<Utc>,
) -> LedgerStats {
    let monthly_total: Decimal = approved
        .iter()
        .filter(|(amount, date)| amount.is_sign_negative() && *date >= month_start)
        .map(|(amount, _)| amount.abs())
        .sum();

    let total_transactions = approved.len() as u64;
    let average_transaction = if approved.is_empty() {
        Decimal::ZERO
    } else {
        let sum_abs: Decimal = approved.iter().map(|(amount, _)| amount.abs()).sum();
        (sum_abs / Decimal::from(total_transactions)).round_dp(2)
    };

    LedgerStats {
        current_balance,
        monthly_total,
        pending_count,
        average_transaction,
        total_transactions,
    }
}
