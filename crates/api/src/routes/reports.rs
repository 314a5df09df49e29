//! Report export routes.

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::{error, info};

use crate::middleware::AuthUser;
use crate::AppState;
use budgetmate_core::dashboard;
use budgetmate_core::reports::{
    ReportData, ReportGoal, ReportTransaction, ReportUser, build_workbook,
};
use budgetmate_db::repositories::transaction::to_ledger_record;
use budgetmate_db::{GoalRepository, TransactionFilter, TransactionRepository, UserRepository};

/// XLSX content type.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Creates the report routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/me", get(export_my_report))
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

/// GET /reports/me - Export the authenticated user's workbook report.
async fn export_my_report(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "user_not_found",
                    "message": "User not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error loading user for report");
            return internal_error();
        }
    };

    let tx_repo = TransactionRepository::new((*state.db).clone());

    let transactions = match tx_repo
        .list_by_user(user.id, TransactionFilter::default())
        .await
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to load transactions for report");
            return internal_error();
        }
    };

    let records: Vec<_> = transactions.iter().map(to_ledger_record).collect();
    let summary = dashboard::summarize(&records);
    let categories = dashboard::category_breakdown(&records);

    let goal_repo = GoalRepository::new((*state.db).clone());
    let goals = match goal_repo.list_by_user(user.id).await {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "Failed to load goals for report");
            return internal_error();
        }
    };

    let data = ReportData {
        user: ReportUser {
            name: user.name.clone(),
            email: user.email.clone(),
            salary: user.salary,
        },
        summary,
        transactions: records
            .iter()
            .zip(&transactions)
            .map(|(record, model)| ReportTransaction {
                date: record.date,
                entry_type: record.entry_type,
                category: record.category.clone(),
                amount: record.amount,
                description: model.description.clone(),
            })
            .collect(),
        goals: goals
            .into_iter()
            .map(|g| ReportGoal {
                name: g.goal.name,
                target_amount: g.goal.target_amount,
                saved_amount: g.saved_amount,
                status: g.goal.status.into(),
                end_date: g.goal.end_date,
            })
            .collect(),
        categories,
    };

    let bytes = match build_workbook(&data) {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "Failed to build report workbook");
            return internal_error();
        }
    };

    info!(user_id = %user.id, size = bytes.len(), "Report exported");

    let date = chrono::Utc::now().date_naive();
    let file_name = format!("BudgetMate-report-{}-{date}.xlsx", user.id);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
