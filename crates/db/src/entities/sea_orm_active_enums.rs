//! `SeaORM` active enums mapping Postgres enum types.

use budgetmate_core::goal::GoalStatus as CoreGoalStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular user.
    #[sea_orm(string_value = "user")]
    User,
    /// Administrator.
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    /// Returns the role as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Ledger transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl TransactionType {
    /// Returns the type as its wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a type from its wire string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

/// Goal lifecycle status, as stored.
///
/// The stored value is a cached projection of
/// `budgetmate_core::goal::derive_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "goal_status")]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Goal is still being saved toward.
    #[sea_orm(string_value = "active")]
    Active,
    /// Saved amount has reached the target.
    #[sea_orm(string_value = "achieved")]
    Achieved,
    /// End date has passed without reaching the target.
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl From<CoreGoalStatus> for GoalStatus {
    fn from(status: CoreGoalStatus) -> Self {
        match status {
            CoreGoalStatus::Active => Self::Active,
            CoreGoalStatus::Achieved => Self::Achieved,
            CoreGoalStatus::Expired => Self::Expired,
        }
    }
}

impl From<GoalStatus> for CoreGoalStatus {
    fn from(status: GoalStatus) -> Self {
        match status {
            GoalStatus::Active => Self::Active,
            GoalStatus::Achieved => Self::Achieved,
            GoalStatus::Expired => Self::Expired,
        }
    }
}

impl GoalStatus {
    /// Returns the status as its wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Achieved => "achieved",
            Self::Expired => "expired",
        }
    }
}
