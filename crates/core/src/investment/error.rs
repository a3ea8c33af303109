//! Investment error types.

use nestegg_shared::{AppError, GoalId, InvestmentId};
use thiserror::Error;

use crate::store::StoreError;

/// Investment-related errors.
#[derive(Debug, Error)]
pub enum InvestmentError {
    /// Debt percentage outside `[0, 100]`.
    #[error("Percentage debt must be a number between 0 and 100")]
    DebtOutOfRange,

    /// Equity percentage outside `[0, 100]`.
    #[error("Percentage equity must be a number between 0 and 100")]
    EquityOutOfRange,

    /// The two sides do not add up to 100.
    #[error("Percentage debt and equity must sum to 100")]
    SumMismatch,

    /// An update named neither side.
    #[error("Provide percentage_debt, percentage_equity, or both")]
    EmptyUpdate,

    /// Goal absent or owned by someone else.
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),

    /// Investment absent or owned by someone else.
    #[error("Investment not found: {0}")]
    NotFound(InvestmentId),

    /// The goal already carries an investment.
    #[error("Goal {0} already has an investment")]
    AlreadyExists(GoalId),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InvestmentError> for AppError {
    fn from(err: InvestmentError) -> Self {
        match err {
            InvestmentError::DebtOutOfRange
            | InvestmentError::EquityOutOfRange
            | InvestmentError::SumMismatch
            | InvestmentError::EmptyUpdate => Self::Validation(err.to_string()),
            InvestmentError::GoalNotFound(_) => Self::NotFound(
                "Goal not found or you don't have permission to create investment for it"
                    .to_string(),
            ),
            InvestmentError::NotFound(_) => Self::NotFound(
                "Investment not found or you don't have permission to update it".to_string(),
            ),
            InvestmentError::AlreadyExists(_) => {
                Self::Conflict("This goal already has an investment".to_string())
            }
            InvestmentError::Store(e) => e.into(),
        }
    }
}
