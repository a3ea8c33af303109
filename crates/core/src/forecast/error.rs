//! Forecast error types.

use nestegg_shared::{AppError, GoalId};
use thiserror::Error;

use super::types::MAX_FORECAST_MONTHS;
use crate::store::StoreError;

/// Forecast errors.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Horizon outside the supported range.
    #[error("months must be between 1 and {MAX_FORECAST_MONTHS}")]
    InvalidHorizon(u32),

    /// Contribution below zero.
    #[error("monthly_contribution must be a non-negative number")]
    NegativeContribution,

    /// Contribution larger than any stored amount.
    #[error("monthly_contribution is too large")]
    ContributionTooLarge,

    /// The projected value left the representable range.
    #[error("Projected value is too large to compute")]
    ValueOverflow,

    /// Goal absent or owned by someone else.
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),

    /// Goal has no investment record to project with.
    #[error("Goal {0} has no investment split")]
    MissingInvestment(GoalId),

    /// Calendar arithmetic overflowed.
    #[error("Forecast horizon exceeds the supported calendar range")]
    DateOverflow,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ForecastError> for AppError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::InvalidHorizon(_)
            | ForecastError::NegativeContribution
            | ForecastError::ContributionTooLarge
            | ForecastError::ValueOverflow => Self::Validation(err.to_string()),
            ForecastError::GoalNotFound(_) => Self::NotFound(
                "Goal not found or you don't have permission to access it".to_string(),
            ),
            ForecastError::MissingInvestment(_) => {
                Self::NotFound("No investment split found for this goal".to_string())
            }
            ForecastError::DateOverflow => Self::Internal(err.to_string()),
            ForecastError::Store(e) => e.into(),
        }
    }
}
