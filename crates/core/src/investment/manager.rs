//! Investment record manager.

use std::sync::Arc;

use nestegg_shared::{GoalId, InvestmentId, UserId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::InvestmentError;
use super::split::Split;
use super::types::{Investment, NewInvestment, SplitUpdate};
use crate::store::{GoalStore, InvestmentStore, StoreError};

/// Creates, reads, updates and deletes investment records.
pub struct InvestmentManager {
    goals: Arc<dyn GoalStore>,
    investments: Arc<dyn InvestmentStore>,
}

impl InvestmentManager {
    /// Creates a new manager.
    #[must_use]
    pub fn new(goals: Arc<dyn GoalStore>, investments: Arc<dyn InvestmentStore>) -> Self {
        Self { goals, investments }
    }

    /// Lists the user's investments.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Investment>, InvestmentError> {
        Ok(self.investments.list_investments(user_id).await?)
    }

    /// Returns the investment attached to a goal.
    ///
    /// # Errors
    ///
    /// Returns `GoalNotFound` when the goal has no investment visible to the user.
    pub async fn get_for_goal(
        &self,
        user_id: UserId,
        goal_id: GoalId,
    ) -> Result<Investment, InvestmentError> {
        self.investments
            .find_investment_for_goal(user_id, goal_id)
            .await?
            .ok_or(InvestmentError::GoalNotFound(goal_id))
    }

    /// Creates the investment for a goal.
    ///
    /// The split is validated before any lookup, so bad percentages never
    /// touch storage.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad split, `GoalNotFound` when the
    /// goal is absent or not owned, and `AlreadyExists` when the goal
    /// already has an investment.
    pub async fn create(
        &self,
        user_id: UserId,
        goal_id: GoalId,
        percentage_debt: Decimal,
        percentage_equity: Decimal,
    ) -> Result<Investment, InvestmentError> {
        let split = Split::validated(percentage_debt, percentage_equity)?;

        if self.goals.find_goal(user_id, goal_id).await?.is_none() {
            return Err(InvestmentError::GoalNotFound(goal_id));
        }
        self.attach(user_id, goal_id, split).await
    }

    /// Inserts the investment for a goal the caller already verified.
    pub(crate) async fn attach(
        &self,
        user_id: UserId,
        goal_id: GoalId,
        split: Split,
    ) -> Result<Investment, InvestmentError> {
        if self
            .investments
            .find_investment_for_goal(user_id, goal_id)
            .await?
            .is_some()
        {
            return Err(InvestmentError::AlreadyExists(goal_id));
        }

        let investment = self
            .investments
            .insert_investment(user_id, NewInvestment { goal_id, split })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => InvestmentError::AlreadyExists(goal_id),
                other => InvestmentError::Store(other),
            })?;

        info!(
            user_id = %user_id,
            goal_id = %goal_id,
            investment_id = %investment.id,
            equity = %investment.percentage_equity,
            debt = %investment.percentage_debt,
            "Investment created"
        );
        Ok(investment)
    }

    /// Applies a partial split update.
    ///
    /// With both sides present they are checked together. With one side the
    /// other becomes its complement, after confirming the record exists.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad or empty update and `NotFound`
    /// when the investment is absent or not owned.
    pub async fn update(
        &self,
        user_id: UserId,
        id: InvestmentId,
        changes: SplitUpdate,
    ) -> Result<Investment, InvestmentError> {
        let split = match (changes.percentage_debt, changes.percentage_equity) {
            (Some(debt), Some(equity)) => Split::validated(debt, equity)?,
            (Some(debt), None) => {
                let split = Split::from_debt(debt)?;
                self.ensure_owned(user_id, id).await?;
                split
            }
            (None, Some(equity)) => {
                let split = Split::from_equity(equity)?;
                self.ensure_owned(user_id, id).await?;
                split
            }
            (None, None) => return Err(InvestmentError::EmptyUpdate),
        };

        let investment = self
            .investments
            .update_investment(user_id, id, split)
            .await?
            .ok_or(InvestmentError::NotFound(id))?;

        info!(
            user_id = %user_id,
            investment_id = %id,
            equity = %investment.percentage_equity,
            debt = %investment.percentage_debt,
            "Investment updated"
        );
        Ok(investment)
    }

    /// Deletes an investment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing was deleted.
    pub async fn delete(&self, user_id: UserId, id: InvestmentId) -> Result<(), InvestmentError> {
        if self.investments.delete_investment(user_id, id).await? {
            info!(user_id = %user_id, investment_id = %id, "Investment deleted");
            Ok(())
        } else {
            Err(InvestmentError::NotFound(id))
        }
    }

    // Ownership check only. A one-sided update derives the other side from the
    // supplied value, so the stored split is not needed.
    async fn ensure_owned(&self, user_id: UserId, id: InvestmentId) -> Result<(), InvestmentError> {
        match self.investments.find_investment(user_id, id).await? {
            Some(_) => Ok(()),
            None => Err(InvestmentError::NotFound(id)),
        }
    }
}
