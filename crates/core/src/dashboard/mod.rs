//! Ledger aggregation into dashboard summaries.
//!
//! Pure calculations over ledger records fetched by the store layer; the
//! caller applies any user or date-range scoping before handing records in.

pub mod types;

pub use types::{CategoryBreakdown, DashboardSummary, EntryType, LedgerRecord, MonthlySavings};

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::Decimal;

/// How many recent months the dashboard time series covers.
const MONTHLY_SAVINGS_WINDOW: usize = 6;

/// Computes full-history totals and the recent monthly savings series.
///
/// The monthly series covers the six most recent calendar months that have
/// any transactions, returned in ascending chronological order.
#[must_use]
pub fn summarize(records: &[LedgerRecord]) -> DashboardSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;

    // (year, month) keys sort chronologically in the map.
    let mut months: BTreeMap<(i32, u32), (Decimal, Decimal)> = BTreeMap::new();

    for record in records {
        let bucket = months
            .entry((record.date.year(), record.date.month()))
            .or_default();
        match record.entry_type {
            EntryType::Income => {
                total_income += record.amount;
                bucket.0 += record.amount;
            }
            EntryType::Expense => {
                total_expense += record.amount;
                bucket.1 += record.amount;
            }
        }
    }

    let skip = months.len().saturating_sub(MONTHLY_SAVINGS_WINDOW);
    let monthly_savings = months
        .into_iter()
        .skip(skip)
        .map(|((year, month), (income, expense))| MonthlySavings {
            month: format!("{year:04}-{month:02}"),
            income,
            expense,
            savings: income - expense,
        })
        .collect();

    DashboardSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        monthly_savings,
    }
}

/// Computes the income/expense split per category, ordered by category name.
#[must_use]
pub fn category_breakdown(records: &[LedgerRecord]) -> Vec<CategoryBreakdown> {
    let mut categories: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();

    for record in records {
        let bucket = categories.entry(record.category.as_str()).or_default();
        match record.entry_type {
            EntryType::Income => bucket.0 += record.amount,
            EntryType::Expense => bucket.1 += record.amount,
        }
    }

    categories
        .into_iter()
        .map(|(category, (income, expense))| CategoryBreakdown {
            category: category.to_string(),
            income,
            expense,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(entry_type: EntryType, category: &str, amount: Decimal, date: &str) -> LedgerRecord {
        LedgerRecord {
            entry_type,
            category: category.to_string(),
            amount,
            date: date.parse::<NaiveDate>().unwrap(),
        }
    }

    #[test]
    fn test_empty_ledger_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.total_expense, Decimal::ZERO);
        assert_eq!(summary.balance, Decimal::ZERO);
        assert!(summary.monthly_savings.is_empty());
    }

    #[test]
    fn test_totals_and_balance() {
        let records = vec![
            record(EntryType::Income, "Salary", dec!(3000), "2026-07-01"),
            record(EntryType::Expense, "Rent", dec!(1200), "2026-07-02"),
            record(EntryType::Expense, "Groceries", dec!(300.50), "2026-07-10"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_income, dec!(3000));
        assert_eq!(summary.total_expense, dec!(1500.50));
        assert_eq!(summary.balance, dec!(1499.50));
    }

    #[test]
    fn test_monthly_savings_grouped_and_ascending() {
        let records = vec![
            record(EntryType::Income, "Salary", dec!(1000), "2026-06-01"),
            record(EntryType::Expense, "Rent", dec!(400), "2026-06-15"),
            record(EntryType::Income, "Salary", dec!(1000), "2026-07-01"),
            record(EntryType::Expense, "Rent", dec!(600), "2026-07-15"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.monthly_savings.len(), 2);
        assert_eq!(summary.monthly_savings[0].month, "2026-06");
        assert_eq!(summary.monthly_savings[0].savings, dec!(600));
        assert_eq!(summary.monthly_savings[1].month, "2026-07");
        assert_eq!(summary.monthly_savings[1].savings, dec!(400));
    }

    #[test]
    fn test_monthly_savings_keeps_six_most_recent_months() {
        let mut records = Vec::new();
        for month in 1..=8 {
            records.push(record(
                EntryType::Income,
                "Salary",
                dec!(100),
                &format!("2026-{month:02}-01"),
            ));
        }
        let summary = summarize(&records);
        assert_eq!(summary.monthly_savings.len(), 6);
        assert_eq!(summary.monthly_savings[0].month, "2026-03");
        assert_eq!(summary.monthly_savings[5].month, "2026-08");
    }

    #[test]
    fn test_months_without_activity_are_skipped() {
        let records = vec![
            record(EntryType::Income, "Salary", dec!(100), "2026-01-01"),
            record(EntryType::Income, "Salary", dec!(100), "2026-05-01"),
        ];
        let summary = summarize(&records);
        let months: Vec<&str> = summary
            .monthly_savings
            .iter()
            .map(|m| m.month.as_str())
            .collect();
        assert_eq!(months, vec!["2026-01", "2026-05"]);
    }

    #[test]
    fn test_category_breakdown_ordered_by_name() {
        let records = vec![
            record(EntryType::Expense, "Rent", dec!(1200), "2026-07-01"),
            record(EntryType::Expense, "Groceries", dec!(200), "2026-07-02"),
            record(EntryType::Income, "Salary", dec!(3000), "2026-07-03"),
            record(EntryType::Expense, "Groceries", dec!(100), "2026-07-20"),
        ];
        let breakdown = category_breakdown(&records);
        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Groceries", "Rent", "Salary"]);
        assert_eq!(breakdown[0].expense, dec!(300));
        assert_eq!(breakdown[2].income, dec!(3000));
    }

    #[test]
    fn test_category_splits_income_and_expense() {
        let records = vec![
            record(EntryType::Income, "Side gig", dec!(250), "2026-07-01"),
            record(EntryType::Expense, "Side gig", dec!(50), "2026-07-02"),
        ];
        let breakdown = category_breakdown(&records);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].income, dec!(250));
        assert_eq!(breakdown[0].expense, dec!(50));
    }
}
