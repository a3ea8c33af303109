//! Forecast types.

use chrono::NaiveDate;
use nestegg_shared::GoalId;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::investment::Split;

/// Longest supported horizon: 30 years.
pub const MAX_FORECAST_MONTHS: u32 = 360;

/// Parameters of a projection.
#[derive(Debug, Clone, Copy)]
pub struct ForecastInput {
    /// Starting value.
    pub current_amount: Decimal,
    /// Equity/debt mix applied every month.
    pub split: Split,
    /// Added at the end of every month.
    pub monthly_contribution: Decimal,
    /// Number of months to project, 1 to [`MAX_FORECAST_MONTHS`].
    pub months: u32,
    /// Labels start with the month after this date.
    pub start: NaiveDate,
}

/// Projected value at the end of one month, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    /// Calendar month, `YYYY-MM`.
    pub month: String,
    /// Total projected value.
    pub total_value: Decimal,
    /// Portion held in equity.
    pub equity_value: Decimal,
    /// Portion held in debt.
    pub debt_value: Decimal,
}

/// A goal's projection together with the assumptions behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalForecast {
    /// The projected goal.
    pub goal_id: GoalId,
    /// Equity share used.
    pub percentage_equity: Decimal,
    /// Debt share used.
    pub percentage_debt: Decimal,
    /// Monthly contribution used.
    pub monthly_contribution: Decimal,
    /// One point per month.
    pub points: Vec<ForecastPoint>,
}
