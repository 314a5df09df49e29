//! Core business logic for BudgetMate.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing
//! - `goal` - Savings goal status derivation and contribution reconciliation planning
//! - `dashboard` - Ledger aggregation into dashboard summaries
//! - `reports` - Workbook report generation

pub mod auth;
pub mod dashboard;
pub mod goal;
pub mod reports;
