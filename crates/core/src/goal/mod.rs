//! Savings goal logic: status derivation and contribution reconciliation planning.

pub mod reconcile;
pub mod status;

pub use reconcile::{
    CONTRIBUTION_CATEGORY, CONTRIBUTION_EDIT_CATEGORY, LedgerSide, REFUND_CATEGORY, SyntheticEntry,
    contribution_added, contribution_adjusted, contribution_removed,
};
pub use status::{GoalStatus, derive_status};
