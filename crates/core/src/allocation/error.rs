//! Allocation error types.

use nestegg_shared::{AppError, GoalId};
use thiserror::Error;

use crate::store::StoreError;

/// Allocation errors.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The batch was empty.
    #[error("At least one allocation is required")]
    Empty,

    /// An amount was zero or negative.
    #[error("All allocation amounts must be positive numbers")]
    NonPositiveAmount(GoalId),

    /// An amount exceeds the largest storable amount.
    #[error("Allocation amount is too large")]
    AmountTooLarge(GoalId),

    /// The goal's balance would exceed the largest storable amount.
    #[error("Allocation would exceed the maximum goal balance")]
    BalanceTooLarge(GoalId),

    /// At least one goal is absent, owned by someone else, or listed twice.
    #[error("One or more goals not found or you don't have permission to update them")]
    GoalsNotFound,

    /// A goal vanished between the ownership check and its write.
    #[error("Goal disappeared during allocation: {0}")]
    GoalVanished(GoalId),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::Empty
            | AllocationError::NonPositiveAmount(_)
            | AllocationError::AmountTooLarge(_)
            | AllocationError::BalanceTooLarge(_) => Self::Validation(err.to_string()),
            AllocationError::GoalsNotFound | AllocationError::GoalVanished(_) => {
                Self::NotFound(err.to_string())
            }
            AllocationError::Store(e) => e.into(),
        }
    }
}
