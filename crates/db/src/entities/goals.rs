//! `SeaORM` Entity for the goals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::GoalStatus;

/// A savings goal owned by a user.
///
/// The saved amount is never stored here; it is always the live sum of the
/// goal's contributions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Goal name.
    pub name: String,
    /// Positive target amount.
    pub target_amount: Decimal,
    /// Optional description.
    pub description: Option<String>,
    /// Optional end date.
    pub end_date: Option<Date>,
    /// Cached lifecycle status (recomputed lazily on read/write).
    pub status: GoalStatus,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning user.
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    /// Contributions toward this goal.
    #[sea_orm(has_many = "super::goal_contributions::Entity")]
    GoalContributions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::goal_contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalContributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
