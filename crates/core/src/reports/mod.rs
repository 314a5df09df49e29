//! Workbook report generation.
//!
//! A pure, stateless transform: the store layer gathers a user's data, this
//! module turns it into a multi-sheet XLSX workbook.

pub mod types;
pub mod workbook;

pub use types::{ReportData, ReportGoal, ReportTransaction, ReportUser};
pub use workbook::{ReportError, build_workbook};
