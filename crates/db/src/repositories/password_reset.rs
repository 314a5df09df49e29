//! Password reset token repository.
//!
//! Tokens are opaque random strings sent to the user; only their SHA-256
//! hash is stored. A token is single-use, expires 30 minutes after
//! issuance, and is superseded by any newer token for the same user.

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::entities::password_reset_tokens;

/// Validity window for a freshly issued token.
const TOKEN_TTL_MINUTES: i64 = 30;

/// Password reset token repository.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    db: DatabaseConnection,
}

impl PasswordResetRepository {
    /// Creates a new password reset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a token for storage.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Generates a random URL-safe token.
    #[must_use]
    pub fn generate_token() -> String {
        let bytes: [u8; 32] = rand::random();
        base64_url::encode(&bytes)
    }

    /// Issues a new reset token for a user, invalidating any previous ones.
    /// Returns the raw token (not hashed) to be sent to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operations fail.
    pub async fn create_token(&self, user_id: Uuid) -> Result<String, DbErr> {
        self.invalidate_user_tokens(user_id).await?;

        let raw_token = Self::generate_token();
        let token_hash = Self::hash_token(&raw_token);
        let now = Utc::now();
        let expires_at = now + Duration::minutes(TOKEN_TTL_MINUTES);

        let token = password_reset_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at.into()),
            used_at: Set(None),
            created_at: Set(now.into()),
        };

        token.insert(&self.db).await?;

        Ok(raw_token)
    }

    /// Finds the unused, unexpired token matching a raw token string.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_valid(
        &self,
        raw_token: &str,
    ) -> Result<Option<password_reset_tokens::Model>, DbErr> {
        let token_hash = Self::hash_token(raw_token);

        password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::TokenHash.eq(&token_hash))
            .filter(password_reset_tokens::Column::UsedAt.is_null())
            .filter(password_reset_tokens::Column::ExpiresAt.gt(Utc::now()))
            .one(&self.db)
            .await
    }

    /// Marks a token as used.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_used(&self, id: Uuid) -> Result<(), DbErr> {
        let Some(token) = password_reset_tokens::Entity::find_by_id(id)
            .one(&self.db)
            .await?
        else {
            return Ok(());
        };

        let mut active: password_reset_tokens::ActiveModel = token.into();
        active.used_at = Set(Some(Utc::now().into()));
        active.update(&self.db).await?;

        Ok(())
    }

    /// Invalidates all active tokens for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn invalidate_user_tokens(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let now = Utc::now();

        let result = password_reset_tokens::Entity::update_many()
            .col_expr(
                password_reset_tokens::Column::UsedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(password_reset_tokens::Column::UserId.eq(user_id))
            .filter(password_reset_tokens::Column::UsedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = PasswordResetRepository::hash_token("some-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        // Deterministic
        assert_eq!(hash, PasswordResetRepository::hash_token("some-token"));
    }

    #[test]
    fn test_generated_tokens_are_unique_and_urlsafe() {
        let a = PasswordResetRepository::generate_token();
        let b = PasswordResetRepository::generate_token();
        assert_ne!(a, b);
        assert!(a.len() >= 32);
        assert!(!a.contains('+') && !a.contains('/'));
    }
}
