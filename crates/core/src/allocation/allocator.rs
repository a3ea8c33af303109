//! Surplus allocator.
//!
//! Allocation happens in three phases:
//! 1. every amount is checked, so a bad batch writes nothing
//! 2. ownership of all referenced goals is confirmed with one fetch, which
//!    must return one goal per allocation (a repeated id counts as missing)
//! 3. goals are incremented one at a time, in input order
//!
//! Each write is an atomic increment on the stored value. If a write fails
//! the error is returned at once and earlier increments stay committed.

use std::sync::Arc;

use nestegg_shared::{GoalId, UserId};
use rust_decimal::Decimal;
use tracing::{error, info};

use super::error::AllocationError;
use super::types::Allocation;
use crate::goal::Goal;
use crate::store::{GoalStore, MAX_STORED_AMOUNT};

/// Adds surplus money to goals.
pub struct SurplusAllocator {
    goals: Arc<dyn GoalStore>,
}

impl SurplusAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new(goals: Arc<dyn GoalStore>) -> Self {
        Self { goals }
    }

    /// Adds `amount` to one goal. Same rules as a one-element batch.
    pub async fn allocate(
        &self,
        user_id: UserId,
        goal_id: GoalId,
        amount: Decimal,
    ) -> Result<Goal, AllocationError> {
        let mut updated = self
            .allocate_many(user_id, &[Allocation { goal_id, amount }])
            .await?;
        updated.pop().ok_or(AllocationError::GoalVanished(goal_id))
    }

    /// Applies a batch and returns the updated goals in input order.
    ///
    /// # Errors
    ///
    /// Returns `Empty`, `NonPositiveAmount` or `AmountTooLarge` before touching
    /// storage. Returns `GoalsNotFound` before any write if a goal is not the
    /// user's or appears twice, and `BalanceTooLarge` if a goal would exceed
    /// the largest storable amount.
    pub async fn allocate_many(
        &self,
        user_id: UserId,
        allocations: &[Allocation],
    ) -> Result<Vec<Goal>, AllocationError> {
        if allocations.is_empty() {
            return Err(AllocationError::Empty);
        }
        if let Some(bad) = allocations.iter().find(|a| a.amount <= Decimal::ZERO) {
            return Err(AllocationError::NonPositiveAmount(bad.goal_id));
        }
        if let Some(bad) = allocations.iter().find(|a| a.amount > MAX_STORED_AMOUNT) {
            return Err(AllocationError::AmountTooLarge(bad.goal_id));
        }

        let ids: Vec<GoalId> = allocations.iter().map(|a| a.goal_id).collect();
        let owned = self.goals.find_goals(user_id, &ids).await?;
        if owned.len() != allocations.len() {
            return Err(AllocationError::GoalsNotFound);
        }

        for goal in &owned {
            let Some(allocation) = allocations.iter().find(|a| a.goal_id == goal.id) else {
                return Err(AllocationError::GoalsNotFound);
            };
            let fits = goal
                .current_amount
                .checked_add(allocation.amount)
                .is_some_and(|total| total <= MAX_STORED_AMOUNT);
            if !fits {
                return Err(AllocationError::BalanceTooLarge(goal.id));
            }
        }

        let mut updated = Vec::with_capacity(allocations.len());
        for (applied, allocation) in allocations.iter().enumerate() {
            let goal = self
                .goals
                .increment_current_amount(user_id, allocation.goal_id, allocation.amount)
                .await
                .map_err(|e| {
                    error!(
                        user_id = %user_id,
                        goal_id = %allocation.goal_id,
                        applied,
                        error = %e,
                        "Allocation write failed, earlier allocations stay applied"
                    );
                    AllocationError::Store(e)
                })?
                .ok_or(AllocationError::GoalVanished(allocation.goal_id))?;
            updated.push(goal);
        }

        info!(
            user_id = %user_id,
            allocations = allocations.len(),
            total = %allocations.iter().map(|a| a.amount).sum::<Decimal>(),
            "Surplus allocated"
        );
        Ok(updated)
    }
}
