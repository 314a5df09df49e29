//! Dashboard aggregation types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger entry direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

/// A ledger record as seen by the aggregator: just enough of a transaction
/// to sum and bucket it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Entry direction.
    pub entry_type: EntryType,
    /// Category label.
    pub category: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Calendar date.
    pub date: NaiveDate,
}

/// Income/expense/savings for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySavings {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    /// Income total for the month.
    pub income: Decimal,
    /// Expense total for the month.
    pub expense: Decimal,
    /// `income - expense`.
    pub savings: Decimal,
}

/// Full dashboard summary for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Full-history income total.
    pub total_income: Decimal,
    /// Full-history expense total.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub balance: Decimal,
    /// Up to the six most recent months with activity, ascending.
    pub monthly_savings: Vec<MonthlySavings>,
}

/// Income/expense split for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    /// Category label.
    pub category: String,
    /// Income total for the category.
    pub income: Decimal,
    /// Expense total for the category.
    pub expense: Decimal,
}
