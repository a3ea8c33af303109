//! Forecasts for stored goals.

use std::sync::Arc;

use chrono::NaiveDate;
use nestegg_shared::{GoalId, UserId};
use rust_decimal::Decimal;
use tracing::debug;

use super::engine::{project, validate_parameters};
use super::error::ForecastError;
use super::types::{ForecastInput, GoalForecast};
use crate::store::{GoalStore, InvestmentStore};

/// Loads a goal and its split, then projects it. Read-only.
pub struct GrowthForecaster {
    goals: Arc<dyn GoalStore>,
    investments: Arc<dyn InvestmentStore>,
}

impl GrowthForecaster {
    /// Creates a new forecaster.
    #[must_use]
    pub fn new(goals: Arc<dyn GoalStore>, investments: Arc<dyn InvestmentStore>) -> Self {
        Self { goals, investments }
    }

    /// Projects the goal's value for `months` months after `start`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad parameters, `GoalNotFound` for a
    /// goal the user does not own and `MissingInvestment` when the goal has
    /// no split.
    pub async fn forecast_goal(
        &self,
        user_id: UserId,
        goal_id: GoalId,
        monthly_contribution: Decimal,
        months: u32,
        start: NaiveDate,
    ) -> Result<GoalForecast, ForecastError> {
        validate_parameters(months, monthly_contribution)?;

        let goal = self
            .goals
            .find_goal(user_id, goal_id)
            .await?
            .ok_or(ForecastError::GoalNotFound(goal_id))?;
        let split = self
            .investments
            .find_investment_for_goal(user_id, goal_id)
            .await?
            .ok_or(ForecastError::MissingInvestment(goal_id))?
            .split();

        let points = project(&ForecastInput {
            current_amount: goal.current_amount,
            split,
            monthly_contribution,
            months,
            start,
        })?;
        debug!(user_id = %user_id, goal_id = %goal_id, months, "Forecast computed");

        Ok(GoalForecast {
            goal_id,
            percentage_equity: split.percentage_equity(),
            percentage_debt: split.percentage_debt(),
            monthly_contribution,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::NewGoal;
    use crate::investment::{NewInvestment, Split};
    use crate::memory::MemoryStore;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    async fn seeded(store: &MemoryStore, user: UserId, with_investment: bool) -> GoalId {
        let goal = store
            .insert_goal(
                user,
                NewGoal {
                    name: "Nest egg".into(),
                    description: None,
                    target_amount: dec!(100000),
                },
            )
            .await
            .unwrap();
        store.increment_current_amount(user, goal.id, dec!(1000)).await.unwrap();
        if with_investment {
            store
                .insert_investment(
                    user,
                    NewInvestment {
                        goal_id: goal.id,
                        split: Split::from_equity(dec!(100)).unwrap(),
                    },
                )
                .await
                .unwrap();
        }
        goal.id
    }

    #[tokio::test]
    async fn test_forecast_uses_stored_state() {
        let store = Arc::new(MemoryStore::new());
        let user = UserId::new();
        let goal_id = seeded(&store, user, true).await;

        let forecast = GrowthForecaster::new(store.clone(), store.clone())
            .forecast_goal(user, goal_id, Decimal::ZERO, 1, start())
            .await
            .unwrap();
        assert_eq!(forecast.percentage_equity, dec!(100));
        assert_eq!(forecast.points[0].month, "2026-02");
        assert_eq!(forecast.points[0].total_value, dec!(1010));

        // Read-only: the stored amount is unchanged.
        let goal = store.find_goal(user, goal_id).await.unwrap().unwrap();
        assert_eq!(goal.current_amount, dec!(1000));
    }

    #[tokio::test]
    async fn test_forecast_requires_owned_goal_with_split() {
        let store = Arc::new(MemoryStore::new());
        let user = UserId::new();
        let bare = seeded(&store, user, false).await;
        let forecaster = GrowthForecaster::new(store.clone(), store.clone());

        let err = forecaster
            .forecast_goal(user, bare, Decimal::ZERO, 12, start())
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::MissingInvestment(_)));

        let err = forecaster
            .forecast_goal(UserId::new(), bare, Decimal::ZERO, 12, start())
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::GoalNotFound(_)));
    }
}
