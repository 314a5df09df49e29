//! Contribution reconciler: atomic contribution + ledger pairing.
//!
//! Every contribution add/edit/delete must adjust the owner's transaction
//! ledger in the same database transaction, so the two stay consistent
//! under failure. This type is the only path that mutates contributions;
//! the paired synthetic transaction is planned by
//! `budgetmate_core::goal::reconcile` and executed here, so no caller can
//! perform one half without the other.
//!
//! Ownership checks run before any write. There is no optimistic locking:
//! concurrent edits of the same contribution race with last-write-wins,
//! and a delta may be computed against a stale prior amount.

use budgetmate_core::goal::reconcile::{
    LedgerSide, SyntheticEntry, contribution_added, contribution_adjusted, contribution_removed,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{goal_contributions, goals, sea_orm_active_enums::TransactionType};
use crate::repositories::goal::{GoalError, GoalRepository, GoalWithSaved};
use crate::repositories::transaction::{CreateTransactionInput, TransactionRepository};

/// Error types for contribution operations.
#[derive(Debug, thiserror::Error)]
pub enum ContributionError {
    /// Goal not found (or not owned by the acting user).
    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),

    /// Contribution not found under the given goal.
    #[error("Contribution not found: {0}")]
    ContributionNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<GoalError> for ContributionError {
    fn from(error: GoalError) -> Self {
        match error {
            GoalError::NotFound(id) => Self::GoalNotFound(id),
            GoalError::Database(e) => Self::Database(e),
        }
    }
}

/// Reconciler keeping a goal's contribution history and the owner's ledger
/// mutually consistent.
#[derive(Debug, Clone)]
pub struct ContributionReconciler {
    db: DatabaseConnection,
    goals: GoalRepository,
}

impl ContributionReconciler {
    /// Creates a new reconciler.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let goals = GoalRepository::new(db.clone());
        Self { db, goals }
    }

    /// Adds a contribution to a goal and books the paired expense, as one
    /// atomic unit. Returns the refreshed goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound` for a nonexistent or non-owned goal; any
    /// mid-transaction failure rolls back both writes.
    pub async fn add_contribution(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<GoalWithSaved, ContributionError> {
        let goal = self.goals.find_model(goal_id, user_id).await?;
        let entry = contribution_added(&goal.name, amount, date);

        let txn = self.db.begin().await?;

        let now = Utc::now().into();
        let contribution = goal_contributions::ActiveModel {
            id: Set(Uuid::new_v4()),
            goal_id: Set(goal.id),
            amount: Set(amount),
            contribution_date: Set(date),
            created_at: Set(now),
        };
        contribution.insert(&txn).await?;

        Self::book_entry(&txn, user_id, &entry).await?;

        txn.commit().await?;

        info!(%goal_id, %amount, "Contribution added");

        Ok(self.goals.find_by_id(goal_id, user_id).await?)
    }

    /// Updates a contribution's amount and date, booking only the delta on
    /// the ledger, as one atomic unit. Returns the refreshed goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound`/`ContributionNotFound` before any write; any
    /// mid-transaction failure rolls back both writes.
    pub async fn update_contribution(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        contribution_id: Uuid,
        new_amount: Decimal,
        new_date: NaiveDate,
    ) -> Result<GoalWithSaved, ContributionError> {
        let goal = self.goals.find_model(goal_id, user_id).await?;
        let existing = self.find_contribution(&goal, contribution_id).await?;

        let entry = contribution_adjusted(&goal.name, existing.amount, new_amount, new_date);

        let txn = self.db.begin().await?;

        let mut active: goal_contributions::ActiveModel = existing.into();
        active.amount = Set(new_amount);
        active.contribution_date = Set(new_date);
        active.update(&txn).await?;

        if let Some(entry) = &entry {
            Self::book_entry(&txn, user_id, entry).await?;
        }

        txn.commit().await?;

        info!(%goal_id, %contribution_id, "Contribution updated");

        Ok(self.goals.find_by_id(goal_id, user_id).await?)
    }

    /// Deletes a contribution and books the refunding income, dated today,
    /// as one atomic unit. Returns the refreshed goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound`/`ContributionNotFound` before any write; any
    /// mid-transaction failure rolls back both writes.
    pub async fn delete_contribution(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        contribution_id: Uuid,
    ) -> Result<GoalWithSaved, ContributionError> {
        let goal = self.goals.find_model(goal_id, user_id).await?;
        let existing = self.find_contribution(&goal, contribution_id).await?;

        let today = Utc::now().date_naive();
        let entry = contribution_removed(&goal.name, existing.amount, today);

        let txn = self.db.begin().await?;

        goal_contributions::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        Self::book_entry(&txn, user_id, &entry).await?;

        txn.commit().await?;

        info!(%goal_id, %contribution_id, "Contribution deleted");

        Ok(self.goals.find_by_id(goal_id, user_id).await?)
    }

    /// Loads a contribution under an already-ownership-checked goal.
    async fn find_contribution(
        &self,
        goal: &goals::Model,
        contribution_id: Uuid,
    ) -> Result<goal_contributions::Model, ContributionError> {
        goal_contributions::Entity::find_by_id(contribution_id)
            .filter(goal_contributions::Column::GoalId.eq(goal.id))
            .one(&self.db)
            .await?
            .ok_or(ContributionError::ContributionNotFound(contribution_id))
    }

    /// Inserts the synthetic transaction planned for a contribution change.
    async fn book_entry<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        entry: &SyntheticEntry,
    ) -> Result<(), DbErr> {
        let input = CreateTransactionInput {
            user_id,
            transaction_type: match entry.side {
                LedgerSide::Income => TransactionType::Income,
                LedgerSide::Expense => TransactionType::Expense,
            },
            category: entry.category.to_string(),
            amount: entry.amount,
            description: Some(entry.description.clone()),
            transaction_date: entry.date,
        };

        TransactionRepository::create_in(conn, &input).await?;
        Ok(())
    }
}
