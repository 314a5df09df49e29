//! Planning of synthetic ledger entries for contribution changes.
//!
//! Every contribution add/edit/delete must be paired with a ledger mutation
//! so the user's balance always reflects money moved into or out of goals.
//! This module decides WHAT ledger entry pairs with a change; the store layer
//! executes the plan inside a single database transaction. Keeping the
//! pairing behind one interface means no caller can write one half without
//! the other.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Category for the expense recorded when money enters a goal.
pub const CONTRIBUTION_CATEGORY: &str = "Goal Contribution";

/// Category for the expense recorded when a contribution is increased.
pub const CONTRIBUTION_EDIT_CATEGORY: &str = "Goal Contribution (edit)";

/// Category for the income recorded when contribution money flows back out.
pub const REFUND_CATEGORY: &str = "Salary";

/// Which side of the ledger a synthetic entry lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSide {
    /// Money returning to the user's disposable balance.
    Income,
    /// Money leaving the user's disposable balance.
    Expense,
}

/// A planned synthetic ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticEntry {
    /// Ledger side.
    pub side: LedgerSide,
    /// Category label.
    pub category: &'static str,
    /// Entry amount, always positive.
    pub amount: Decimal,
    /// Human-readable description referencing the goal.
    pub description: String,
    /// Calendar date the entry is recorded under.
    pub date: NaiveDate,
}

impl SyntheticEntry {
    /// The entry's amount signed by ledger side: expenses negative, income
    /// positive, from the disposable-balance point of view.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            LedgerSide::Income => self.amount,
            LedgerSide::Expense => -self.amount,
        }
    }
}

/// Plans the ledger entry paired with a new contribution: an expense of the
/// full amount, dated like the contribution.
#[must_use]
pub fn contribution_added(goal_name: &str, amount: Decimal, date: NaiveDate) -> SyntheticEntry {
    SyntheticEntry {
        side: LedgerSide::Expense,
        category: CONTRIBUTION_CATEGORY,
        amount,
        description: format!("Contribution to goal: {goal_name}"),
        date,
    }
}

/// Plans the ledger entry paired with an edited contribution.
///
/// Only the delta moves: an increase books an extra expense, a decrease books
/// an income reversing part of the earlier expense, and an unchanged amount
/// books nothing. The entry is dated at the NEW contribution date, not the
/// original one.
#[must_use]
pub fn contribution_adjusted(
    goal_name: &str,
    old_amount: Decimal,
    new_amount: Decimal,
    new_date: NaiveDate,
) -> Option<SyntheticEntry> {
    let delta = new_amount - old_amount;

    if delta > Decimal::ZERO {
        Some(SyntheticEntry {
            side: LedgerSide::Expense,
            category: CONTRIBUTION_EDIT_CATEGORY,
            amount: delta,
            description: format!("Increase contribution to goal: {goal_name}"),
            date: new_date,
        })
    } else if delta < Decimal::ZERO {
        Some(SyntheticEntry {
            side: LedgerSide::Income,
            category: REFUND_CATEGORY,
            amount: -delta,
            description: format!("Decrease contribution to goal: {goal_name}"),
            date: new_date,
        })
    } else {
        None
    }
}

/// Plans the ledger entry paired with a deleted contribution: an income
/// refunding the full amount, dated today rather than at the original
/// contribution date.
#[must_use]
pub fn contribution_removed(goal_name: &str, amount: Decimal, today: NaiveDate) -> SyntheticEntry {
    SyntheticEntry {
        side: LedgerSide::Income,
        category: REFUND_CATEGORY,
        amount,
        description: format!("Delete contribution to goal: {goal_name}"),
        date: today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_added_books_full_expense() {
        let entry = contribution_added("Vacation", dec!(500), day(2026, 8, 1));
        assert_eq!(entry.side, LedgerSide::Expense);
        assert_eq!(entry.category, CONTRIBUTION_CATEGORY);
        assert_eq!(entry.amount, dec!(500));
        assert_eq!(entry.description, "Contribution to goal: Vacation");
        assert_eq!(entry.date, day(2026, 8, 1));
    }

    #[test]
    fn test_increase_books_delta_expense() {
        let entry = contribution_adjusted("Vacation", dec!(300), dec!(450), day(2026, 8, 2))
            .expect("increase must book an entry");
        assert_eq!(entry.side, LedgerSide::Expense);
        assert_eq!(entry.category, CONTRIBUTION_EDIT_CATEGORY);
        assert_eq!(entry.amount, dec!(150));
    }

    #[test]
    fn test_decrease_books_refund_income() {
        let entry = contribution_adjusted("Vacation", dec!(300), dec!(100), day(2026, 8, 2))
            .expect("decrease must book an entry");
        assert_eq!(entry.side, LedgerSide::Income);
        assert_eq!(entry.category, REFUND_CATEGORY);
        assert_eq!(entry.amount, dec!(200));
        assert_eq!(entry.description, "Decrease contribution to goal: Vacation");
    }

    #[test]
    fn test_unchanged_amount_books_nothing() {
        assert_eq!(
            contribution_adjusted("Vacation", dec!(300), dec!(300), day(2026, 8, 2)),
            None
        );
    }

    #[test]
    fn test_removed_refunds_full_amount_dated_today() {
        let entry = contribution_removed("Vacation", dec!(300), day(2026, 8, 7));
        assert_eq!(entry.side, LedgerSide::Income);
        assert_eq!(entry.category, REFUND_CATEGORY);
        assert_eq!(entry.amount, dec!(300));
        assert_eq!(entry.date, day(2026, 8, 7));
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        /// The signed sum of entries booked by an edit equals new - old
        /// from the goal's point of view (goal gains delta, balance loses it).
        #[test]
        fn prop_adjustment_signed_sum_is_delta(
            old in amount_strategy(),
            new in amount_strategy(),
        ) {
            let plan = contribution_adjusted("g", old, new, day(2026, 8, 1));
            let booked = plan.as_ref().map_or(Decimal::ZERO, SyntheticEntry::signed_amount);
            prop_assert_eq!(booked, old - new);
        }

        /// Planned amounts are always strictly positive.
        #[test]
        fn prop_amounts_positive(
            old in amount_strategy(),
            new in amount_strategy(),
        ) {
            if let Some(entry) = contribution_adjusted("g", old, new, day(2026, 8, 1)) {
                prop_assert!(entry.amount > Decimal::ZERO);
            }
            prop_assert!(contribution_added("g", new, day(2026, 8, 1)).amount > Decimal::ZERO);
            prop_assert!(contribution_removed("g", old, day(2026, 8, 1)).amount > Decimal::ZERO);
        }

        /// Add followed by remove nets to zero on the ledger.
        #[test]
        fn prop_add_then_remove_nets_zero(amount in amount_strategy()) {
            let added = contribution_added("g", amount, day(2026, 8, 1));
            let removed = contribution_removed("g", amount, day(2026, 8, 2));
            prop_assert_eq!(added.signed_amount() + removed.signed_amount(), Decimal::ZERO);
        }
    }
}
