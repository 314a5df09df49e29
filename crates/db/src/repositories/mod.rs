//! Repository abstractions for data access.

pub mod contribution;
pub mod goal;
pub mod password_reset;
pub mod transaction;
pub mod user;

pub use contribution::{ContributionError, ContributionReconciler};
pub use goal::{GoalError, GoalRepository, GoalWithSaved};
pub use password_reset::PasswordResetRepository;
pub use transaction::{TransactionError, TransactionFilter, TransactionRepository};
pub use user::UserRepository;
