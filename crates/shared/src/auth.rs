//! Authentication types for JWT claims and API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// Carries the user id and role, nothing else; every other fact about the
/// user is loaded from the store per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role (`user` or `admin`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// User display name.
    pub name: String,
    /// User email.
    pub email: String,
    /// User password (plaintext, hashed before storage).
    pub password: String,
    /// Optional monthly salary, as a decimal string.
    pub salary: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Forgot-password request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Email to send reset instructions to.
    pub email: String,
}

/// Reset-password request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    /// The opaque reset token from the email link.
    pub token: String,
    /// The new password.
    pub password: String,
}

/// Partial profile update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New salary, as a decimal string.
    pub salary: Option<String>,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Monthly salary as a decimal string.
    pub salary: String,
    /// Role (`user` or `admin`).
    pub role: String,
}

/// Response for register and login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token.
    pub token: String,
    /// Authenticated user info.
    pub user: UserInfo,
}

/// Response for forgot-password.
///
/// Always returned with HTTP 200; `reset_link` is present only when email
/// delivery is unavailable so the caller can still complete the flow.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordResponse {
    /// Human-readable outcome message.
    pub message: String,
    /// Whether the reset email was handed to the mail transport.
    pub delivered: bool,
    /// Fallback reset link when delivery is unavailable.
    #[serde(rename = "resetLink", skip_serializing_if = "Option::is_none")]
    pub reset_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_carry_user_id() {
        let id = Uuid::new_v4();
        let claims = Claims::new(id, "user", Utc::now() + Duration::hours(24));
        assert_eq!(claims.user_id(), id);
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_reset_link_omitted_when_delivered() {
        let response = ForgotPasswordResponse {
            message: "sent".to_string(),
            delivered: true,
            reset_link: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("resetLink").is_none());
        assert_eq!(json["delivered"], true);
    }
}
