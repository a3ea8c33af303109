//! Monthly compounding projection.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::ForecastError;
use super::types::{ForecastInput, ForecastPoint, MAX_FORECAST_MONTHS};
use crate::store::MAX_STORED_AMOUNT;

/// Expected yearly return of the equity portion.
pub const ANNUAL_EQUITY_RETURN: Decimal = dec!(0.12);

/// Expected yearly return of the debt portion.
pub const ANNUAL_DEBT_RETURN: Decimal = dec!(0.07);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Projects a goal's value month by month.
///
/// Each month the blended rate `e * 0.12/12 + d * 0.07/12` is applied to the
/// running value and the contribution is added. The running value keeps full
/// precision; only emitted points are rounded to whole units.
///
/// # Errors
///
/// Returns `InvalidHorizon`, `NegativeContribution` or `ContributionTooLarge`
/// for bad parameters, and `ValueOverflow` when the projected value leaves the
/// representable range.
pub fn project(input: &ForecastInput) -> Result<Vec<ForecastPoint>, ForecastError> {
    validate_parameters(input.months, input.monthly_contribution)?;

    let equity = input.split.equity_fraction();
    let debt = input.split.debt_fraction();
    let monthly_rate = equity * (ANNUAL_EQUITY_RETURN / MONTHS_PER_YEAR)
        + debt * (ANNUAL_DEBT_RETURN / MONTHS_PER_YEAR);

    let first_label = next_month(input.start).ok_or(ForecastError::DateOverflow)?;

    let mut value = input.current_amount;
    let mut points = Vec::with_capacity(input.months as usize);
    for month in 1..=input.months {
        value = value
            .checked_mul(monthly_rate)
            .and_then(|growth| value.checked_add(growth))
            .and_then(|grown| grown.checked_add(input.monthly_contribution))
            .ok_or(ForecastError::ValueOverflow)?;

        let label = first_label
            .checked_add_months(Months::new(month - 1))
            .ok_or(ForecastError::DateOverflow)?;
        points.push(ForecastPoint {
            month: label.format("%Y-%m").to_string(),
            total_value: whole(value),
            equity_value: whole(value * equity),
            debt_value: whole(value * debt),
        });
    }
    Ok(points)
}

/// Checks the horizon and contribution.
pub(crate) fn validate_parameters(months: u32, contribution: Decimal) -> Result<(), ForecastError> {
    if !(1..=MAX_FORECAST_MONTHS).contains(&months) {
        return Err(ForecastError::InvalidHorizon(months));
    }
    if contribution < Decimal::ZERO {
        return Err(ForecastError::NegativeContribution);
    }
    if contribution > MAX_STORED_AMOUNT {
        return Err(ForecastError::ContributionTooLarge);
    }
    Ok(())
}

fn whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// First day of the month after `date`, as used for the first label.
#[must_use]
pub fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))
}
