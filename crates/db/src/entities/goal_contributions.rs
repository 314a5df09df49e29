//! `SeaORM` Entity for the goal_contributions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single deposit toward a goal's target.
///
/// Contribution changes are always paired with a synthetic transaction by
/// the reconciler; the two are not foreign-keyed to each other.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "goal_contributions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning goal.
    pub goal_id: Uuid,
    /// Positive amount.
    pub amount: Decimal,
    /// Calendar date of the contribution.
    pub contribution_date: Date,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning goal.
    #[sea_orm(
        belongs_to = "super::goals::Entity",
        from = "Column::GoalId",
        to = "super::goals::Column::Id"
    )]
    Goals,
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
