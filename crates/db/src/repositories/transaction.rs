//! Transaction repository for ledger database operations.
//!
//! All operations are scoped by the owning user's id; a non-owned or
//! nonexistent id surfaces as `NotFound`, never as a permission error.

use budgetmate_core::dashboard::{EntryType, LedgerRecord};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{sea_orm_active_enums::TransactionType, transactions};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found (or not owned by the acting user).
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Direction.
    pub transaction_type: TransactionType,
    /// Category label.
    pub category: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
    /// Calendar date.
    pub transaction_date: NaiveDate,
}

/// Filter options for listing transactions. Absent filters are no-ops;
/// present ones are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by category.
    pub category: Option<String>,
    /// Filter by direction.
    pub transaction_type: Option<TransactionType>,
    /// Filter by date range start (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (inclusive).
    pub end_date: Option<NaiveDate>,
}

/// Partial field changes for a transaction update.
///
/// Only fields set to `Some` are written. `description` uses a nested
/// `Option` so a present `null` clears the field.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    /// New direction.
    pub transaction_type: Option<TransactionType>,
    /// New category.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New calendar date.
    pub transaction_date: Option<NaiveDate>,
}

impl TransactionChanges {
    /// Returns true when no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.transaction_date.is_none()
    }
}

/// Maps a transaction row into the aggregator's ledger record shape.
#[must_use]
pub fn to_ledger_record(model: &transactions::Model) -> LedgerRecord {
    LedgerRecord {
        entry_type: match model.transaction_type {
            TransactionType::Income => EntryType::Income,
            TransactionType::Expense => EntryType::Expense,
        },
        category: model.category.clone(),
        amount: model.amount,
        date: model.transaction_date,
    }
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let model = Self::build_insert(&input).insert(&self.db).await?;
        Ok(model)
    }

    /// Builds the active model for an insert; shared with the reconciler so
    /// synthetic transactions take the exact same shape as user-entered ones.
    #[must_use]
    pub fn build_insert(input: &CreateTransactionInput) -> transactions::ActiveModel {
        let now = Utc::now().into();
        transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            transaction_type: Set(input.transaction_type),
            category: Set(input.category.clone()),
            amount: Set(input.amount),
            description: Set(input.description.clone()),
            transaction_date: Set(input.transaction_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    /// Inserts a transaction inside an existing database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_in<C: ConnectionTrait>(
        conn: &C,
        input: &CreateTransactionInput,
    ) -> Result<transactions::Model, DbErr> {
        Self::build_insert(input).insert(conn).await
    }

    /// Lists a user's transactions with optional filters, ordered by
    /// transaction date descending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query =
            transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));

        if let Some(category) = filter.category {
            query = query.filter(transactions::Column::Category.eq(category));
        }

        if let Some(transaction_type) = filter.transaction_type {
            query = query.filter(transactions::Column::TransactionType.eq(transaction_type));
        }

        if let Some(start_date) = filter.start_date {
            query = query.filter(transactions::Column::TransactionDate.gte(start_date));
        }

        if let Some(end_date) = filter.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end_date));
        }

        let models = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models)
    }

    /// Gets a transaction by ID, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Applies a partial update to a transaction, returning the refreshed
    /// row. An empty change set is a no-op read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        changes: TransactionChanges,
    ) -> Result<transactions::Model, TransactionError> {
        let model = self.find_by_id(id, user_id).await?;

        if changes.is_empty() {
            return Ok(model);
        }

        let mut active: transactions::ActiveModel = model.into();
        if let Some(transaction_type) = changes.transaction_type {
            active.transaction_type = Set(transaction_type);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(amount) = changes.amount {
            active.amount = Set(amount);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(transaction_date) = changes.transaction_date {
            active.transaction_date = Set(transaction_date);
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a transaction, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a nonexistent or non-owned id.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), TransactionError> {
        self.find_by_id(id, user_id).await?;

        transactions::Entity::delete_by_id(id).exec(&self.db).await?;

        Ok(())
    }

    /// Fetches a user's full ledger as aggregator records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_records(&self, user_id: Uuid) -> Result<Vec<LedgerRecord>, TransactionError> {
        let models = self.list_by_user(user_id, TransactionFilter::default()).await?;
        Ok(models.iter().map(to_ledger_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_changes_detected() {
        assert!(TransactionChanges::default().is_empty());
        assert!(
            !TransactionChanges {
                amount: Some(dec!(10)),
                ..TransactionChanges::default()
            }
            .is_empty()
        );
        // A present null description counts as a write.
        assert!(
            !TransactionChanges {
                description: Some(None),
                ..TransactionChanges::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_ledger_record_mapping() {
        let model = transactions::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            transaction_type: TransactionType::Expense,
            category: "Rent".to_string(),
            amount: dec!(1200),
            description: None,
            transaction_date: "2026-07-01".parse().unwrap(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let record = to_ledger_record(&model);
        assert_eq!(record.entry_type, EntryType::Expense);
        assert_eq!(record.category, "Rent");
        assert_eq!(record.amount, dec!(1200));
    }
}
