//! Goal error types.

use nestegg_shared::{AppError, GoalId};
use thiserror::Error;

use crate::investment::InvestmentError;
use crate::store::StoreError;

/// Goal-related errors.
#[derive(Debug, Error)]
pub enum GoalError {
    /// Name is blank.
    #[error("Goal name is required")]
    EmptyName,

    /// Target amount is zero or negative.
    #[error("Target amount must be a positive number")]
    InvalidTarget,

    /// Current amount is negative.
    #[error("Current amount must be a non-negative number")]
    NegativeCurrent,

    /// Goal absent or owned by someone else.
    #[error("Goal not found: {0}")]
    NotFound(GoalId),

    /// Attaching the investment record failed.
    #[error(transparent)]
    Investment(#[from] InvestmentError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<GoalError> for AppError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::EmptyName | GoalError::InvalidTarget | GoalError::NegativeCurrent => {
                Self::Validation(err.to_string())
            }
            GoalError::NotFound(_) => Self::NotFound(
                "Goal not found or you don't have permission to access it".to_string(),
            ),
            GoalError::Investment(e) => e.into(),
            GoalError::Store(e) => e.into(),
        }
    }
}
