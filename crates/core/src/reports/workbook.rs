//! XLSX workbook assembly.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use thiserror::Error;

use crate::dashboard::EntryType;
use super::types::ReportData;

/// Currency number format applied to money columns.
const CURRENCY_FORMAT: &str = "\u{20b9}#,##0.00";

/// Errors that can occur while building a workbook.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Workbook assembly failed.
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// Cell value for money columns: numeric, currency-formatted.
fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn entry_type_label(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::Income => "income",
        EntryType::Expense => "expense",
    }
}

fn write_headers(
    sheet: &mut Worksheet,
    headers: &[(&str, f64)],
    bold: &Format,
) -> Result<(), ReportError> {
    for (col, (header, width)) in (0u16..).zip(headers.iter().copied()) {
        sheet.write_string_with_format(0, col, header, bold)?;
        sheet.set_column_width(col, width)?;
    }
    Ok(())
}

/// Builds the multi-sheet report workbook and returns it as bytes.
///
/// Sheets: Summary, Monthly Savings, Category Breakdown, Transactions,
/// Goals. Money columns are currency-formatted numbers; dates are ISO
/// strings.
///
/// # Errors
///
/// Returns `ReportError::Workbook` if workbook assembly fails.
pub fn build_workbook(data: &ReportData) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    workbook.set_properties(
        &rust_xlsxwriter::DocProperties::new().set_author("BudgetMate"),
    );

    let bold = Format::new().set_bold();
    let currency = Format::new().set_num_format(CURRENCY_FORMAT);

    // Summary
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    write_headers(sheet, &[("Metric", 25.0), ("Value", 20.0)], &bold)?;
    sheet.write_string(1, 0, "User")?;
    sheet.write_string(1, 1, data.user.name.as_str())?;
    sheet.write_string(2, 0, "Email")?;
    sheet.write_string(2, 1, data.user.email.as_str())?;
    sheet.write_string(3, 0, "Total Income")?;
    sheet.write_number_with_format(3, 1, money(data.summary.total_income), &currency)?;
    sheet.write_string(4, 0, "Total Expense")?;
    sheet.write_number_with_format(4, 1, money(data.summary.total_expense), &currency)?;
    sheet.write_string(5, 0, "Current Balance")?;
    sheet.write_number_with_format(5, 1, money(data.summary.balance), &currency)?;
    sheet.write_string(6, 0, "Salary")?;
    sheet.write_number_with_format(6, 1, money(data.user.salary), &currency)?;

    // Monthly Savings
    let sheet = workbook.add_worksheet();
    sheet.set_name("Monthly Savings")?;
    write_headers(
        sheet,
        &[
            ("Month", 15.0),
            ("Income", 15.0),
            ("Expense", 15.0),
            ("Savings", 15.0),
        ],
        &bold,
    )?;
    let mut row = 1u32;
    for month in &data.summary.monthly_savings {
        sheet.write_string(row, 0, month.month.as_str())?;
        sheet.write_number_with_format(row, 1, money(month.income), &currency)?;
        sheet.write_number_with_format(row, 2, money(month.expense), &currency)?;
        sheet.write_number_with_format(row, 3, money(month.savings), &currency)?;
        row += 1;
    }

    // Category Breakdown
    let sheet = workbook.add_worksheet();
    sheet.set_name("Category Breakdown")?;
    write_headers(
        sheet,
        &[
            ("Category", 20.0),
            ("Total Income", 18.0),
            ("Total Expense", 18.0),
        ],
        &bold,
    )?;
    let mut row = 1u32;
    for category in &data.categories {
        sheet.write_string(row, 0, category.category.as_str())?;
        sheet.write_number_with_format(row, 1, money(category.income), &currency)?;
        sheet.write_number_with_format(row, 2, money(category.expense), &currency)?;
        row += 1;
    }

    // Transactions
    let sheet = workbook.add_worksheet();
    sheet.set_name("Transactions")?;
    write_headers(
        sheet,
        &[
            ("Date", 18.0),
            ("Type", 12.0),
            ("Category", 18.0),
            ("Amount", 15.0),
            ("Description", 30.0),
        ],
        &bold,
    )?;
    let mut row = 1u32;
    for transaction in &data.transactions {
        sheet.write_string(row, 0, transaction.date.to_string())?;
        sheet.write_string(row, 1, entry_type_label(transaction.entry_type))?;
        sheet.write_string(row, 2, transaction.category.as_str())?;
        sheet.write_number_with_format(row, 3, money(transaction.amount), &currency)?;
        if let Some(description) = &transaction.description {
            sheet.write_string(row, 4, description.as_str())?;
        }
        row += 1;
    }

    // Goals
    let sheet = workbook.add_worksheet();
    sheet.set_name("Goals")?;
    write_headers(
        sheet,
        &[
            ("Name", 20.0),
            ("Target Amount", 18.0),
            ("Saved Amount", 18.0),
            ("Status", 12.0),
            ("End Date", 18.0),
        ],
        &bold,
    )?;
    let mut row = 1u32;
    for goal in &data.goals {
        sheet.write_string(row, 0, goal.name.as_str())?;
        sheet.write_number_with_format(row, 1, money(goal.target_amount), &currency)?;
        sheet.write_number_with_format(row, 2, money(goal.saved_amount), &currency)?;
        sheet.write_string(row, 3, goal.status.as_str())?;
        if let Some(end_date) = goal.end_date {
            sheet.write_string(row, 4, end_date.to_string())?;
        }
        row += 1;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{CategoryBreakdown, DashboardSummary, MonthlySavings};
    use crate::goal::GoalStatus;
    use crate::reports::types::{ReportGoal, ReportTransaction, ReportUser};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_data() -> ReportData {
        ReportData {
            user: ReportUser {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                salary: dec!(50000),
            },
            summary: DashboardSummary {
                total_income: dec!(50000),
                total_expense: dec!(12000),
                balance: dec!(38000),
                monthly_savings: vec![MonthlySavings {
                    month: "2026-07".to_string(),
                    income: dec!(50000),
                    expense: dec!(12000),
                    savings: dec!(38000),
                }],
            },
            transactions: vec![ReportTransaction {
                date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
                entry_type: EntryType::Expense,
                category: "Rent".to_string(),
                amount: dec!(12000),
                description: Some("July rent".to_string()),
            }],
            goals: vec![ReportGoal {
                name: "Emergency fund".to_string(),
                target_amount: dec!(100000),
                saved_amount: dec!(25000),
                status: GoalStatus::Active,
                end_date: None,
            }],
            categories: vec![CategoryBreakdown {
                category: "Rent".to_string(),
                income: dec!(0),
                expense: dec!(12000),
            }],
        }
    }

    #[test]
    fn test_workbook_bytes_are_xlsx() {
        let bytes = build_workbook(&sample_data()).unwrap();
        // XLSX is a zip container.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn test_workbook_handles_empty_data() {
        let data = ReportData {
            user: ReportUser {
                name: "Empty".to_string(),
                email: "empty@example.com".to_string(),
                salary: dec!(0),
            },
            summary: DashboardSummary {
                total_income: dec!(0),
                total_expense: dec!(0),
                balance: dec!(0),
                monthly_savings: vec![],
            },
            transactions: vec![],
            goals: vec![],
            categories: vec![],
        };
        let bytes = build_workbook(&data).unwrap();
        assert!(!bytes.is_empty());
    }
}
