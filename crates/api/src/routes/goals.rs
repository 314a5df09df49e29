//! Savings goal routes, including contribution endpoints.
//!
//! Contribution mutations go through the reconciler only, so the paired
//! ledger write can never be skipped.

use axum::{
    Json, Router,
    extract::{Path, State},
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
use budgetmate_core::goal::GoalStatus as CoreGoalStatus;
use budgetmate_db::entities::goal_contributions;
use budgetmate_db::repositories::contribution::ContributionError;
use budgetmate_db::repositories::goal::{CreateGoalInput, GoalChanges, GoalError};
use budgetmate_db::{ContributionReconciler, GoalRepository, GoalWithSaved};

/// Creates the goal routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(list_goals))
        .route("/goals", post(create_goal))
        .route("/goals/{id}", get(get_goal))
        .route("/goals/{id}", put(update_goal))
        .route("/goals/{id}", delete(delete_goal))
        .route("/goals/{id}/contributions", get(list_contributions))
        .route("/goals/{id}/contributions", post(add_contribution))
        .route(
            "/goals/{id}/contributions/{contribution_id}",
            put(update_contribution),
        )
        .route(
            "/goals/{id}/contributions/{contribution_id}",
            delete(delete_contribution),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a goal.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// Goal name.
    pub name: String,
    /// Positive target amount as a decimal string.
    #[serde(rename = "targetAmount")]
    pub target_amount: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional end date (YYYY-MM-DD).
    #[serde(rename = "endDate")]
    pub end_date: Option<NaiveDate>,
}

/// Request body for updating a goal. Absent fields keep their prior values;
/// a present `null` clears description or end date.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    /// New name.
    pub name: Option<String>,
    /// New target amount as a decimal string.
    #[serde(rename = "targetAmount")]
    pub target_amount: Option<String>,
    /// New description (`null` clears).
    #[serde(default, with = "crate::routes::validation::double_option")]
    pub description: Option<Option<String>>,
    /// New end date (`null` clears).
    #[serde(default, rename = "endDate", with = "crate::routes::validation::double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    /// Explicit status; re-derived right afterwards, so a stale value is
    /// corrected immediately.
    pub status: Option<String>,
}

/// Request body for adding or updating a contribution.
#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    /// Positive amount as a decimal string.
    pub amount: String,
    /// Calendar date (YYYY-MM-DD).
    #[serde(rename = "contributionDate")]
    pub contribution_date: NaiveDate,
}

/// Response shape for a goal, including its live saved amount.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    /// Goal ID.
    pub id: Uuid,
    /// Goal name.
    pub name: String,
    /// Target amount as a decimal string.
    pub target_amount: String,
    /// Live saved amount as a decimal string.
    pub saved_amount: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional end date (YYYY-MM-DD).
    pub end_date: Option<String>,
    /// Lifecycle status.
    pub status: &'static str,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<GoalWithSaved> for GoalResponse {
    fn from(goal: GoalWithSaved) -> Self {
        let GoalWithSaved { goal, saved_amount } = goal;
        Self {
            id: goal.id,
            name: goal.name,
            target_amount: goal.target_amount.to_string(),
            saved_amount: saved_amount.to_string(),
            description: goal.description,
            end_date: goal.end_date.map(|d| d.to_string()),
            status: goal.status.as_str(),
            created_at: goal.created_at.to_rfc3339(),
            updated_at: goal.updated_at.to_rfc3339(),
        }
    }
}

/// Response shape for a contribution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionResponse {
    /// Contribution ID.
    pub id: Uuid,
    /// Owning goal ID.
    pub goal_id: Uuid,
    /// Amount as a decimal string.
    pub amount: String,
    /// Calendar date (YYYY-MM-DD).
    pub contribution_date: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<goal_contributions::Model> for ContributionResponse {
    fn from(model: goal_contributions::Model) -> Self {
        Self {
            id: model.id,
            goal_id: model.goal_id,
            amount: model.amount.to_string(),
            contribution_date: model.contribution_date.to_string(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Error helpers
// ============================================================================

fn goal_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "goal_not_found",
            "message": "Goal not found"
        })),
    )
        .into_response()
}

fn contribution_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "contribution_not_found",
            "message": "Contribution not found"
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

fn contribution_error_response(error: &ContributionError, context: &str) -> axum::response::Response {
    match error {
        ContributionError::GoalNotFound(_) => goal_not_found(),
        ContributionError::ContributionNotFound(_) => contribution_not_found(),
        ContributionError::Database(e) => {
            error!(error = %e, "{context}");
            internal_error()
        }
    }
}

// ============================================================================
// Goal Handlers
// ============================================================================

/// GET /goals - List the user's goals with live saved amounts.
async fn list_goals(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let goal_repo = GoalRepository::new((*state.db).clone());

    match goal_repo.list_by_user(auth.user_id()).await {
        Ok(goals) => {
            let goals: Vec<GoalResponse> = goals.into_iter().map(GoalResponse::from).collect();
            (StatusCode::OK, Json(json!({ "goals": goals }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list goals");
            internal_error()
        }
    }
}

/// POST /goals - Create a goal.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateGoalRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    check_required_text(&payload.name, "name", 150, &mut errors);
    let target_amount = parse_positive_amount(&payload.target_amount, "targetAmount", &mut errors);
    check_optional_text(payload.description.as_deref(), "description", 255, &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }
    let Some(target_amount) = target_amount else {
        return internal_error();
    };

    let goal_repo = GoalRepository::new((*state.db).clone());

    let input = CreateGoalInput {
        user_id: auth.user_id(),
        name: payload.name.trim().to_string(),
        target_amount,
        description: payload.description,
        end_date: payload.end_date,
    };

    match goal_repo.create(input).await {
        Ok(goal) => {
            info!(user_id = %auth.user_id(), goal_id = %goal.goal.id, "Goal created");
            (
                StatusCode::CREATED,
                Json(json!({ "goal": GoalResponse::from(goal) })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create goal");
            internal_error()
        }
    }
}

/// GET /goals/{id} - Fetch a single goal.
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let goal_repo = GoalRepository::new((*state.db).clone());

    match goal_repo.find_by_id(id, auth.user_id()).await {
        Ok(goal) => (
            StatusCode::OK,
            Json(json!({ "goal": GoalResponse::from(goal) })),
        )
            .into_response(),
        Err(GoalError::NotFound(_)) => goal_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to load goal");
            internal_error()
        }
    }
}

/// PUT /goals/{id} - Partial update.
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGoalRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    if let Some(name) = payload.name.as_deref() {
        check_required_text(name, "name", 150, &mut errors);
    }
    let target_amount = payload
        .target_amount
        .as_deref()
        .and_then(|a| parse_positive_amount(a, "targetAmount", &mut errors));
    if let Some(description) = &payload.description {
        check_optional_text(description.as_deref(), "description", 255, &mut errors);
    }
    let status = match payload.status.as_deref() {
        Some(value) => {
            let parsed = CoreGoalStatus::parse(value);
            if parsed.is_none() {
                errors.push("status", "must be one of: active, achieved, expired");
            }
            parsed.map(Into::into)
        }
        None => None,
    };
    if !errors.is_empty() {
        return errors.into_response();
    }

    let changes = GoalChanges {
        name: payload.name.map(|n| n.trim().to_string()),
        target_amount,
        description: payload.description,
        end_date: payload.end_date,
        status,
    };

    let goal_repo = GoalRepository::new((*state.db).clone());

    match goal_repo.update(id, auth.user_id(), changes).await {
        Ok(goal) => (
            StatusCode::OK,
            Json(json!({ "goal": GoalResponse::from(goal) })),
        )
            .into_response(),
        Err(GoalError::NotFound(_)) => goal_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update goal");
            internal_error()
        }
    }
}

/// DELETE /goals/{id} - Delete a goal and its contributions.
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let goal_repo = GoalRepository::new((*state.db).clone());

    match goal_repo.delete(id, auth.user_id()).await {
        Ok(()) => {
            info!(user_id = %auth.user_id(), goal_id = %id, "Goal deleted");
            (StatusCode::OK, Json(json!({ "message": "Goal deleted" }))).into_response()
        }
        Err(GoalError::NotFound(_)) => goal_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete goal");
            internal_error()
        }
    }
}

// ============================================================================
// Contribution Handlers
// ============================================================================

/// GET /goals/{id}/contributions - List a goal's contributions.
async fn list_contributions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let goal_repo = GoalRepository::new((*state.db).clone());

    match goal_repo.list_contributions(id, auth.user_id()).await {
        Ok(contributions) => {
            let contributions: Vec<ContributionResponse> = contributions
                .into_iter()
                .map(ContributionResponse::from)
                .collect();
            (
                StatusCode::OK,
                Json(json!({ "contributions": contributions })),
            )
                .into_response()
        }
        Err(GoalError::NotFound(_)) => goal_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to list contributions");
            internal_error()
        }
    }
}

/// POST /goals/{id}/contributions - Add a contribution via the reconciler.
async fn add_contribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContributionRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    let amount = parse_positive_amount(&payload.amount, "amount", &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }
    let Some(amount) = amount else {
        return internal_error();
    };

    let reconciler = ContributionReconciler::new((*state.db).clone());

    match reconciler
        .add_contribution(auth.user_id(), id, amount, payload.contribution_date)
        .await
    {
        Ok(goal) => (
            StatusCode::CREATED,
            Json(json!({ "goal": GoalResponse::from(goal) })),
        )
            .into_response(),
        Err(e) => contribution_error_response(&e, "Failed to add contribution"),
    }
}

/// PUT /goals/{id}/contributions/{contribution_id} - Edit via the reconciler.
async fn update_contribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, contribution_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ContributionRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    let amount = parse_positive_amount(&payload.amount, "amount", &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }
    let Some(amount) = amount else {
        return internal_error();
    };

    let reconciler = ContributionReconciler::new((*state.db).clone());

    match reconciler
        .update_contribution(
            auth.user_id(),
            id,
            contribution_id,
            amount,
            payload.contribution_date,
        )
        .await
    {
        Ok(goal) => (
            StatusCode::OK,
            Json(json!({ "goal": GoalResponse::from(goal) })),
        )
            .into_response(),
        Err(e) => contribution_error_response(&e, "Failed to update contribution"),
    }
}

/// DELETE /goals/{id}/contributions/{contribution_id} - Delete via the
/// reconciler.
async fn delete_contribution(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, contribution_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let reconciler = ContributionReconciler::new((*state.db).clone());

    match reconciler
        .delete_contribution(auth.user_id(), id, contribution_id)
        .await
    {
        Ok(goal) => (
            StatusCode::OK,
            Json(json!({
                "goal": GoalResponse::from(goal),
                "message": "Contribution deleted"
            })),
        )
            .into_response(),
        Err(e) => contribution_error_response(&e, "Failed to delete contribution"),
    }
}
