//! Authentication routes: register, login, password reset, and profile.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{error, info};

use crate::middleware::AuthUser;
use crate::routes::goals::GoalResponse;
use crate::routes::validation::{
    FieldErrors, check_email, check_optional_text, check_password, check_required_text,
    parse_non_negative_amount,
};
use crate::AppState;
use budgetmate_core::auth::{hash_password, verify_password};
use budgetmate_core::dashboard;
use budgetmate_db::repositories::user::UserChanges;
use budgetmate_db::{GoalRepository, PasswordResetRepository, TransactionRepository, UserRepository};
use budgetmate_shared::auth::{
    AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest, UserInfo,
};

use budgetmate_db::entities::users;

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}

/// Creates the auth routes that require a bearer token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_profile))
        .route("/auth/me", put(update_profile))
}

/// Maps a user row into its API shape.
fn user_info(user: &users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        salary: user.salary.to_string(),
        role: user.role.as_str().to_string(),
    }
}

fn internal_error(context: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": format!("An error occurred during {context}")
        })),
    )
        .into_response()
}

/// POST /auth/register - Create a user and return an auth token.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    check_required_text(&payload.name, "name", 100, &mut errors);
    check_email(&payload.email, "email", &mut errors);
    check_password(&payload.password, "password", &mut errors);
    let salary = payload
        .salary
        .as_deref()
        .and_then(|s| parse_non_negative_amount(s, "salary", &mut errors));
    if !errors.is_empty() {
        return errors.into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "Email already registered"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return internal_error("registration");
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("registration");
        }
    };

    let user = match user_repo
        .create(
            payload.name.trim(),
            &payload.email,
            &password_hash,
            salary.unwrap_or(Decimal::ZERO),
        )
        .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return internal_error("registration");
        }
    };

    let token = match state.jwt_service.generate_token(user.id, user.role.as_str()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return internal_error("registration");
        }
    };

    info!(user_id = %user.id, email = %user.email, "New user registered");

    (
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user_info(&user),
        }),
    )
        .into_response()
}

/// POST /auth/login - Authenticate a user and return an auth token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    check_email(&payload.email, "email", &mut errors);
    if payload.password.is_empty() {
        errors.push("password", "must not be empty");
    }
    if !errors.is_empty() {
        return errors.into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("login");
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("login");
        }
    }

    let token = match state.jwt_service.generate_token(user.id, user.role.as_str()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate token");
            return internal_error("login");
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    (
        StatusCode::OK,
        Json(AuthResponse {
            token,
            user: user_info(&user),
        }),
    )
        .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid credentials"
        })),
    )
        .into_response()
}

/// POST /auth/forgot-password - Issue a reset token.
///
/// Always answers 200. When the mail transport is unavailable the reset
/// link is returned in the body so the flow still completes.
async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    check_email(&payload.email, "email", &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            // Same generic answer as the happy path, no existence leak.
            return (
                StatusCode::OK,
                Json(ForgotPasswordResponse {
                    message: "If the email is registered, you'll receive reset instructions shortly."
                        .to_string(),
                    delivered: false,
                    reset_link: None,
                }),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during password reset request");
            return internal_error("password reset");
        }
    };

    let reset_repo = PasswordResetRepository::new((*state.db).clone());

    let token = match reset_repo.create_token(user.id).await {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to create reset token");
            return internal_error("password reset");
        }
    };

    let reset_url = format!("{}/reset-password/{token}", state.client_url);

    let delivered = match state
        .email_service
        .send_password_reset(&user.email, &reset_url)
        .await
    {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "Failed to send password reset email");
            return internal_error("password reset");
        }
    };

    info!(user_id = %user.id, delivered, "Password reset requested");

    let response = if delivered {
        ForgotPasswordResponse {
            message: "Reset instructions sent to your email.".to_string(),
            delivered: true,
            reset_link: None,
        }
    } else {
        ForgotPasswordResponse {
            message: "Email delivery is currently unavailable. Use the link below to reset your password."
                .to_string(),
            delivered: false,
            reset_link: Some(reset_url),
        }
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/reset-password - Consume a reset token and set a new password.
async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    if payload.token.len() < 10 {
        errors.push("token", "must be a valid reset token");
    }
    check_password(&payload.password, "password", &mut errors);
    if !errors.is_empty() {
        return errors.into_response();
    }

    let reset_repo = PasswordResetRepository::new((*state.db).clone());

    let record = match reset_repo.find_valid(&payload.token).await {
        Ok(Some(r)) => r,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_reset_token",
                    "message": "Invalid or expired reset token"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error looking up reset token");
            return internal_error("password reset");
        }
    };

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("password reset");
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let changes = UserChanges {
        password_hash: Some(password_hash),
        ..UserChanges::default()
    };

    match user_repo.update(record.user_id, changes).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_reset_token",
                    "message": "Invalid or expired reset token"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to update password");
            return internal_error("password reset");
        }
    }

    if let Err(e) = reset_repo.mark_used(record.id).await {
        error!(error = %e, "Failed to mark reset token used");
        return internal_error("password reset");
    }

    info!(user_id = %record.user_id, "Password reset completed");

    (
        StatusCode::OK,
        Json(json!({ "message": "Password updated successfully" })),
    )
        .into_response()
}

/// GET /auth/me - Profile aggregate: user, dashboard summary, and goals.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
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
            error!(error = %e, "Database error loading profile");
            return internal_error("profile load");
        }
    };

    let tx_repo = TransactionRepository::new((*state.db).clone());
    let records = match tx_repo.ledger_records(user.id).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to load ledger for profile");
            return internal_error("profile load");
        }
    };
    let summary = dashboard::summarize(&records);

    let goal_repo = GoalRepository::new((*state.db).clone());
    let goals = match goal_repo.list_by_user(user.id).await {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "Failed to load goals for profile");
            return internal_error("profile load");
        }
    };
    let goals: Vec<GoalResponse> = goals.into_iter().map(GoalResponse::from).collect();

    (
        StatusCode::OK,
        Json(json!({
            "user": user_info(&user),
            "dashboard": summary,
            "goals": goals
        })),
    )
        .into_response()
}

/// PUT /auth/me - Partial profile update.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let mut errors = FieldErrors::new();
    if let Some(name) = payload.name.as_deref() {
        check_required_text(name, "name", 100, &mut errors);
    }
    if let Some(email) = payload.email.as_deref() {
        check_email(email, "email", &mut errors);
    }
    check_optional_text(payload.email.as_deref(), "email", 255, &mut errors);
    let salary = payload
        .salary
        .as_deref()
        .and_then(|s| parse_non_negative_amount(s, "salary", &mut errors));
    if !errors.is_empty() {
        return errors.into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    // A changed email must stay unique across users.
    if let Some(email) = payload.email.as_deref() {
        match user_repo.find_by_email(email).await {
            Ok(Some(existing)) if existing.id != auth.user_id() => {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "email_exists",
                        "message": "Email already registered"
                    })),
                )
                    .into_response();
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Database error checking email");
                return internal_error("profile update");
            }
        }
    }

    let changes = UserChanges {
        name: payload.name.map(|n| n.trim().to_string()),
        email: payload.email,
        salary,
        password_hash: None,
    };

    match user_repo.update(auth.user_id(), changes).await {
        Ok(Some(user)) => {
            info!(user_id = %user.id, "Profile updated");
            (StatusCode::OK, Json(json!({ "user": user_info(&user) }))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update profile");
            internal_error("profile update")
        }
    }
}
