//! Report input contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::dashboard::{CategoryBreakdown, DashboardSummary, EntryType};
use crate::goal::GoalStatus;

/// The user a report is generated for.
#[derive(Debug, Clone)]
pub struct ReportUser {
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Monthly salary.
    pub salary: Decimal,
}

/// One transaction row in the report.
#[derive(Debug, Clone)]
pub struct ReportTransaction {
    /// Calendar date.
    pub date: NaiveDate,
    /// Entry direction.
    pub entry_type: EntryType,
    /// Category label.
    pub category: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
}

/// One goal row in the report.
#[derive(Debug, Clone)]
pub struct ReportGoal {
    /// Goal name.
    pub name: String,
    /// Target amount.
    pub target_amount: Decimal,
    /// Live saved amount.
    pub saved_amount: Decimal,
    /// Derived status.
    pub status: GoalStatus,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
}

/// Everything the workbook builder consumes.
#[derive(Debug, Clone)]
pub struct ReportData {
    /// The report's user.
    pub user: ReportUser,
    /// Dashboard summary (totals + monthly series).
    pub summary: DashboardSummary,
    /// Full transaction history.
    pub transactions: Vec<ReportTransaction>,
    /// All goals with live saved amounts.
    pub goals: Vec<ReportGoal>,
    /// Category breakdown over the full history.
    pub categories: Vec<CategoryBreakdown>,
}
