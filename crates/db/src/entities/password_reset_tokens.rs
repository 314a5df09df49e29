//! `SeaORM` Entity for the password_reset_tokens table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single-use password reset token (stored hashed).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_tokens")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// User the token was issued for.
    pub user_id: Uuid,
    /// SHA-256 hash of the opaque token.
    pub token_hash: String,
    /// Expiry timestamp (30 minutes after issuance).
    pub expires_at: DateTimeWithTimeZone,
    /// When the token was consumed or superseded.
    pub used_at: Option<DateTimeWithTimeZone>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// User the token belongs to.
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
