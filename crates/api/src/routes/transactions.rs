//! Ledger transaction routes.
//!
//! Every mutation returns a refreshed dashboard summary alongside the
//! entity, so the client can update its totals without a second round trip.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::middleware::AuthUser;
use crate::routes::validation::{
    FieldErrors, check_optional_text, check_required_text, parse_positive_amount,
};
use crate::AppState;
use budgetmate_core::dashboard::{self, DashboardSummary};
use budgetmate_db::entities::{sea_orm_active_enums::TransactionType, transactions};
use budgetmate_db::repositories::transaction::{
    CreateTransactionInput, TransactionChanges, TransactionError,
};
use budgetmate_db::{TransactionFilter, TransactionRepository};

/// Creates the transaction routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", put(update_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by category.
    pub category: Option<String>,
    /// Filter by direction.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Filter by date range start (YYYY-MM-DD).
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Direction: "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Category label.
    pub category: String,
    /// Positive amount as a decimal string.
    pub amount: String,
    /// Optional description.
    pub description: Option<String>,
    /// Calendar date (YYYY-MM-DD).
    #[serde(rename = "transactionDate")]
    pub transaction_date: NaiveDate,
}

/// Request body for updating a transaction. Absent fields keep their prior
/// values; a present `null` description clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New direction.
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New amount as a decimal string.
    pub amount: Option<String>,
    /// New description (`null` clears).
    #[serde(default, with = "crate::routes::validation::double_option")]
    pub description: Option<Option<String>>,
    /// New calendar date.
    #[serde(rename = "transactionDate")]
    pub transaction_date: Option<NaiveDate>,
}

/// Response shape for a transaction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: Uuid,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: &'static str,
    /// Category label.
    pub category: String,
    /// Amount as a decimal string.
    pub amount: String,
    /// Optional description.
    pub description: Option<String>,
    /// Calendar date (YYYY-MM-DD).
    pub transaction_date: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: model.id,
            transaction_type: model.transaction_type.as_str(),
            category: model.category,
            amount: model.amount.to_string(),
            description: model.description,
            transaction_date: model.transaction_date.to_string(),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn load_summary(
    tx_repo: &TransactionRepository,
    user_id: Uuid,
) -> Result<DashboardSummary, TransactionError> {
    let records = tx_repo.ledger_records(user_id).await?;
    Ok(dashboard::summarize(&records))
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "transaction_not_found",
            "message": "Transaction not found"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// GET /transactions - List with optional filters plus dashboard summary.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let tx_repo = TransactionRepository::new((*state.db).clone());

    // Unknown enum values in filters degrade to no filter.
    let filter = TransactionFilter {
        category: query.category,
        transaction_type: query
            .transaction_type
            .as_deref()
            .and_then(TransactionType::parse),
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let transactions = match tx_repo.list_by_user(auth.user_id(), filter).await {
        Ok(models) => models
            .into_iter()
            .map(TransactionResponse::from)
            .collect::<Vec<_>>(),
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            return internal_error();
        }
    };

    let summary = match load_summary(&tx_repo, auth.user_id()).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to compute summary");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({ "transactions": transactions, "summary": summary })),
    )
        .into_response()
}

/// GET /transactions/{id} - Fetch a single transaction.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let tx_repo = TransactionRepository::new((*state.db).clone());

    match tx_repo.find_by_id(id, auth.user_id()).await {
        Ok(model) => (
            StatusCode::OK,
            Json(json!({ "transaction": TransactionResponse::from(model) })),
        )
            .into_response(),
        Err(TransactionError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to load transaction");
            internal_error()
        }
    }
}

/// POST /transactions - Create a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    let transaction_type = TransactionType::parse(&payload.transaction_type);
    if transaction_type.is_none() {
        errors.push("type", "must be one of: income, expense");
    }
    check_required_text(&payload.category, "category", 100, &mut errors);
    let amount = parse_positive_amount(&payload.amount, "amount", &mut errors);
    check_optional_text(payload.description.as_deref(), "description", 255, &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }
    let (Some(transaction_type), Some(amount)) = (transaction_type, amount) else {
        return internal_error();
    };

    let tx_repo = TransactionRepository::new((*state.db).clone());

    let input = CreateTransactionInput {
        user_id: auth.user_id(),
        transaction_type,
        category: payload.category.trim().to_string(),
        amount,
        description: payload.description,
        transaction_date: payload.transaction_date,
    };

    let model = match tx_repo.create(input).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "Failed to create transaction");
            return internal_error();
        }
    };

    info!(user_id = %auth.user_id(), transaction_id = %model.id, "Transaction created");

    let summary = match load_summary(&tx_repo, auth.user_id()).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to compute summary");
            return internal_error();
        }
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "transaction": TransactionResponse::from(model),
            "summary": summary
        })),
    )
        .into_response()
}

/// PUT /transactions/{id} - Partial update.
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    let transaction_type = match payload.transaction_type.as_deref() {
        Some(value) => {
            let parsed = TransactionType::parse(value);
            if parsed.is_none() {
                errors.push("type", "must be one of: income, expense");
            }
            parsed
        }
        None => None,
    };
    if let Some(category) = payload.category.as_deref() {
        check_required_text(category, "category", 100, &mut errors);
    }
    let amount = payload
        .amount
        .as_deref()
        .and_then(|a| parse_positive_amount(a, "amount", &mut errors));
    if let Some(description) = &payload.description {
        check_optional_text(description.as_deref(), "description", 255, &mut errors);
    }
    if !errors.is_empty() {
        return errors.into_response();
    }

    let changes = TransactionChanges {
        transaction_type,
        category: payload.category.map(|c| c.trim().to_string()),
        amount,
        description: payload.description,
        transaction_date: payload.transaction_date,
    };

    let tx_repo = TransactionRepository::new((*state.db).clone());

    let model = match tx_repo.update(id, auth.user_id(), changes).await {
        Ok(m) => m,
        Err(TransactionError::NotFound(_)) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update transaction");
            return internal_error();
        }
    };

    let summary = match load_summary(&tx_repo, auth.user_id()).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to compute summary");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "transaction": TransactionResponse::from(model),
            "summary": summary
        })),
    )
        .into_response()
}

/// DELETE /transactions/{id} - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let tx_repo = TransactionRepository::new((*state.db).clone());

    match tx_repo.delete(id, auth.user_id()).await {
        Ok(()) => {}
        Err(TransactionError::NotFound(_)) => return not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete transaction");
            return internal_error();
        }
    }

    info!(user_id = %auth.user_id(), transaction_id = %id, "Transaction deleted");

    let summary = match load_summary(&tx_repo, auth.user_id()).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to compute summary");
            return internal_error();
        }
    };

    (
        StatusCode::OK,
        Json(json!({ "message": "Transaction deleted", "summary": summary })),
    )
        .into_response()
}
