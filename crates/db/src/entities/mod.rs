//! `SeaORM` entity definitions.

pub mod goal_contributions;
pub mod goals;
pub mod password_reset_tokens;
pub mod sea_orm_active_enums;
pub mod transactions;
pub mod users;
