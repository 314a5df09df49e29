//! Goal repository for savings goal database operations.
//!
//! The saved amount is never stored; every read aggregates it live from the
//! contributions table. The persisted status is a cached projection synced
//! lazily: whenever a goal passes through this repository the status is
//! re-derived and written back only if it changed.

use budgetmate_core::goal::derive_status;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{goal_contributions, goals, sea_orm_active_enums::GoalStatus};

/// Error types for goal operations.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    /// Goal not found (or not owned by the acting user).
    #[error("Goal not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A goal row together with its live saved amount.
#[derive(Debug, Clone)]
pub struct GoalWithSaved {
    /// The goal row (status already synced).
    pub goal: goals::Model,
    /// Live sum of the goal's contributions.
    pub saved_amount: Decimal,
}

/// Input for creating a goal.
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Goal name.
    pub name: String,
    /// Positive target amount.
    pub target_amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
    /// Optional end date.
    pub end_date: Option<NaiveDate>,
}

/// Partial field changes for a goal update.
#[derive(Debug, Clone, Default)]
pub struct GoalChanges {
    /// New name.
    pub name: Option<String>,
    /// New target amount.
    pub target_amount: Option<Decimal>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New end date (`Some(None)` clears it).
    pub end_date: Option<Option<NaiveDate>>,
    /// Explicit status override (re-derived afterwards anyway).
    pub status: Option<GoalStatus>,
}

impl GoalChanges {
    /// Returns true when no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.target_amount.is_none()
            && self.description.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
    }
}

/// Goal repository for CRUD operations and contribution queries.
#[derive(Debug, Clone)]
pub struct GoalRepository {
    db: DatabaseConnection,
}

impl GoalRepository {
    /// Creates a new goal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new goal (initially `active`, saved amount zero).
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateGoalInput) -> Result<GoalWithSaved, GoalError> {
        let now = Utc::now().into();
        let goal = goals::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            target_amount: Set(input.target_amount),
            description: Set(input.description),
            end_date: Set(input.end_date),
            status: Set(GoalStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = goal.insert(&self.db).await?;
        let synced = self.sync_status(model, Decimal::ZERO).await?;

        Ok(GoalWithSaved {
            goal: synced,
            saved_amount: Decimal::ZERO,
        })
    }

    /// Lists a user's goals with live saved amounts, newest first, statuses
    /// synced.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<GoalWithSaved>, GoalError> {
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_desc(goals::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let saved = self.saved_amount(model.id).await?;
            let synced = self.sync_status(model, saved).await?;
            result.push(GoalWithSaved {
                goal: synced,
                saved_amount: saved,
            });
        }

        Ok(result)
    }

    /// Gets a goal by ID with its live saved amount, scoped to its owner,
    /// status synced.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<GoalWithSaved, GoalError> {
        let model = self.find_model(id, user_id).await?;
        let saved = self.saved_amount(model.id).await?;
        let synced = self.sync_status(model, saved).await?;

        Ok(GoalWithSaved {
            goal: synced,
            saved_amount: saved,
        })
    }

    /// Fetches the bare goal row scoped to its owner, without aggregation or
    /// status syncing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn find_model(&self, id: Uuid, user_id: Uuid) -> Result<goals::Model, GoalError> {
        goals::Entity::find_by_id(id)
            .filter(goals::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(GoalError::NotFound(id))
    }

    /// Applies a partial update to a goal, returning the refreshed row with
    /// saved amount and synced status. An empty change set is a no-op read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: GoalChanges,
    ) -> Result<GoalWithSaved, GoalError> {
        let model = self.find_model(id, user_id).await?;

        if !changes.is_empty() {
            let mut active: goals::ActiveModel = model.into();
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(target_amount) = changes.target_amount {
                active.target_amount = Set(target_amount);
            }
            if let Some(description) = changes.description {
                active.description = Set(description);
            }
            if let Some(end_date) = changes.end_date {
                active.end_date = Set(end_date);
            }
            if let Some(status) = changes.status {
                active.status = Set(status);
            }
            active.updated_at = Set(Utc::now().into());
            active.update(&self.db).await?;
        }

        self.find_by_id(id, user_id).await
    }

    /// Deletes a goal (contributions cascade), scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), GoalError> {
        self.find_model(id, user_id).await?;

        goals::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(())
    }

    /// Lists a goal's contributions newest-first, after verifying ownership.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the goal does not exist or is not owned.
    pub async fn list_contributions(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<goal_contributions::Model>, GoalError> {
        self.find_model(goal_id, user_id).await?;

        let contributions = goal_contributions::Entity::find()
            .filter(goal_contributions::Column::GoalId.eq(goal_id))
            .order_by_desc(goal_contributions::Column::ContributionDate)
            .all(&self.db)
            .await?;

        Ok(contributions)
    }

    /// Sums a goal's contributions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn saved_amount(&self, goal_id: Uuid) -> Result<Decimal, DbErr> {
        let sum: Option<Option<Decimal>> = goal_contributions::Entity::find()
            .select_only()
            .column_as(goal_contributions::Column::Amount.sum(), "saved")
            .filter(goal_contributions::Column::GoalId.eq(goal_id))
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(sum.flatten().unwrap_or(Decimal::ZERO))
    }

    /// Re-derives the goal's status from its aggregates and persists it only
    /// when it differs from the stored value. Deriving twice on an unchanged
    /// goal issues no additional writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the status write fails.
    pub async fn sync_status(
        &self,
        goal: goals::Model,
        saved_amount: Decimal,
    ) -> Result<goals::Model, DbErr> {
        let today = Utc::now().date_naive();
        let derived: GoalStatus =
            derive_status(goal.target_amount, saved_amount, goal.end_date, today).into();

        if goal.status == derived {
            return Ok(goal);
        }

        let mut active: goals::ActiveModel = goal.into();
        active.status = Set(derived);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }
}
