//! Running balance calculations.
//!
//! Each balance-affecting entry carries a snapshot of the float balance
//! immediately after it was recorded. The chain is ordered by the moment a
//! balance is assigned (approval time), never by the user-supplied
//! transaction date, so backdated entries cannot rewrite history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running balance information for a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Balance before this entry.
    pub previous_balance: Decimal,
    /// Balance after this entry.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Creates the running balance for the first entry of an empty ledger.
    #[must_use]
    pub fn first_entry(amount: Decimal) -> Self {
        Self {
            previous_balance: Decimal::ZERO,
            current_balance: amount,
        }
    }

    /// Creates the running balance that follows the previous entry.
    ///
    /// Chain invariant: `current_balance[N] = current_balance[N-1] + amount`.
    #[must_use]
    pub fn next_entry(previous: &Self, amount: Decimal) -> Self {
        Self {
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + amount,
        }
    }

    /// Creates the running balance from the latest persisted balance, if any.
    ///
    /// This is the read-modify-write step every append performs: read the
    /// most recent approved entry's balance (0 for an empty ledger) and add
    /// the new amount. Callers must serialize concurrent appends around it.
    #[must_use]
    pub fn from_latest(latest: Option<Decimal>, amount: Decimal) -> Self {
        let previous_balance = latest.unwrap_or(Decimal::ZERO);
        Self {
            previous_balance,
            current_balance: previous_balance + amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    /// Strategy for generating signed 2-dp amounts.
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating a sequence of amounts.
    fn amounts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec(amount_strategy(), 1..=max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any entry, current_balance equals previous_balance + amount.
        #[test]
        fn prop_current_equals_previous_plus_amount(
            amount in amount_strategy(),
        ) {
            let rb = RunningBalance::first_entry(amount);
            prop_assert_eq!(rb.current_balance, rb.previous_balance + amount);
        }

        /// For any consecutive entries, previous_balance[N] equals
        /// current_balance[N-1].
        #[test]
        fn prop_previous_equals_prior_current(
            amount1 in amount_strategy(),
            amount2 in amount_strategy(),
        ) {
            let rb1 = RunningBalance::first_entry(amount1);
            let rb2 = RunningBalance::next_entry(&rb1, amount2);
            prop_assert_eq!(rb2.previous_balance, rb1.current_balance);
        }

        /// For any sequence of N entries, the final balance equals the sum
        /// of all amounts.
        #[test]
        fn prop_final_balance_equals_sum_of_amounts(
            amounts in amounts_strategy(20),
        ) {
            prop_assume!(!amounts.is_empty());

            let mut current = RunningBalance::first_entry(amounts[0]);
            for amount in amounts.iter().skip(1) {
                current = RunningBalance::next_entry(&current, *amount);
            }

            let expected: Decimal = amounts.iter().copied().sum();
            prop_assert_eq!(current.current_balance, expected);
        }

        /// Appending never alters earlier balances: rebuilding the chain with
        /// one extra amount reproduces every prior snapshot exactly.
        #[test]
        fn prop_append_never_rewrites_history(
            amounts in amounts_strategy(15),
            extra in amount_strategy(),
        ) {
            prop_assume!(!amounts.is_empty());

            let build = |amounts: &[Decimal]| -> Vec<RunningBalance> {
                let mut chain = Vec::with_capacity(amounts.len());
                let mut current = RunningBalance::first_entry(amounts[0]);
                chain.push(current);
                for amount in amounts.iter().skip(1) {
                    current = RunningBalance::next_entry(&current, *amount);
                    chain.push(current);
                }
                chain
            };

            let before = build(&amounts);
            let mut extended = amounts.clone();
            extended.push(extra);
            let after = build(&extended);

            for (i, snapshot) in before.iter().enumerate() {
                prop_assert_eq!(snapshot, &after[i]);
            }
        }

        /// `from_latest` agrees with the explicit chain constructors.
        #[test]
        fn prop_from_latest_matches_chain(
            amount1 in amount_strategy(),
            amount2 in amount_strategy(),
        ) {
            let empty = RunningBalance::from_latest(None, amount1);
            prop_assert_eq!(empty, RunningBalance::first_entry(amount1));

            let chained = RunningBalance::next_entry(&empty, amount2);
            let resumed = RunningBalance::from_latest(Some(empty.current_balance), amount2);
            prop_assert_eq!(chained, resumed);
        }
    }

    #[test]
    fn test_first_entry_base_case() {
        let rb = RunningBalance::first_entry(dec!(-45.50));
        assert_eq!(rb.previous_balance, dec!(0));
        assert_eq!(rb.current_balance, dec!(-45.50));
    }

    #[test]
    fn test_expense_then_replenishment_chain() {
        // Empty ledger, two expenses, one replenishment credit.
        let rb1 = RunningBalance::first_entry(dec!(-45.50));
        assert_eq!(rb1.current_balance, dec!(-45.50));

        let rb2 = RunningBalance::next_entry(&rb1, dec!(-10.00));
        assert_eq!(rb2.previous_balance, dec!(-45.50));
        assert_eq!(rb2.current_balance, dec!(-55.50));

        let rb3 = RunningBalance::next_entry(&rb2, dec!(500.00));
        assert_eq!(rb3.previous_balance, dec!(-55.50));
        assert_eq!(rb3.current_balance, dec!(444.50));
    }

    #[test]
    fn test_from_latest_empty_ledger() {
        let rb = RunningBalance::from_latest(None, dec!(250.00));
        assert_eq!(rb.previous_balance, dec!(0));
        assert_eq!(rb.current_balance, dec!(250.00));
    }
}
