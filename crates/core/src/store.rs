//! Persistence ports.
//!
//! Every method takes the authenticated caller's [`UserId`] and must scope the
//! query to that user's rows. Rows owned by someone else behave exactly like
//! rows that do not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nestegg_shared::{AppError, CategoryId, GoalId, InvestmentId, UserId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::budget::{Category, CategoryUpdate, NewCategory};
use crate::goal::{Goal, GoalUpdate, NewGoal};
use crate::investment::{Investment, NewInvestment, Split};
use crate::ledger::{NewTransaction, Transaction, TransactionFilter, TransactionUpdate};
use crate::progress::Progress;

/// Largest value a stored money column (`NUMERIC(19, 4)`) can hold.
pub const MAX_STORED_AMOUNT: Decimal = dec!(999999999999999.9999);

/// Errors reported by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Any other backend failure.
    #[error("Storage failure: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Database(msg),
        }
    }
}

/// Budget category persistence.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Lists the user's categories.
    async fn list_categories(&self, user_id: UserId) -> Result<Vec<Category>, StoreError>;

    /// Finds a category by name, ignoring case.
    async fn find_category_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Category>, StoreError>;

    /// Inserts a category.
    async fn insert_category(
        &self,
        user_id: UserId,
        input: NewCategory,
    ) -> Result<Category, StoreError>;

    /// Applies a partial update. Returns `None` when the row is absent or not owned.
    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        changes: CategoryUpdate,
    ) -> Result<Option<Category>, StoreError>;

    /// Deletes a category. Returns `false` when nothing was deleted.
    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<bool, StoreError>;
}

/// Savings goal persistence.
#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Lists the user's goals, newest first.
    async fn list_goals(&self, user_id: UserId) -> Result<Vec<Goal>, StoreError>;

    /// Finds one goal.
    async fn find_goal(&self, user_id: UserId, id: GoalId) -> Result<Option<Goal>, StoreError>;

    /// Fetches every listed goal the user owns in a single query.
    async fn find_goals(&self, user_id: UserId, ids: &[GoalId]) -> Result<Vec<Goal>, StoreError>;

    /// Inserts a goal with `current_amount = 0`.
    async fn insert_goal(&self, user_id: UserId, input: NewGoal) -> Result<Goal, StoreError>;

    /// Applies a partial update. Returns `None` when the row is absent or not owned.
    async fn update_goal(
        &self,
        user_id: UserId,
        id: GoalId,
        changes: GoalUpdate,
    ) -> Result<Option<Goal>, StoreError>;

    /// Deletes a goal together with its investment record.
    async fn delete_goal(&self, user_id: UserId, id: GoalId) -> Result<bool, StoreError>;

    /// Adds `amount` to the persisted `current_amount` in one atomic statement.
    async fn increment_current_amount(
        &self,
        user_id: UserId,
        id: GoalId,
        amount: Decimal,
    ) -> Result<Option<Goal>, StoreError>;
}

/// Investment split persistence.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Lists the user's investments.
    async fn list_investments(&self, user_id: UserId) -> Result<Vec<Investment>, StoreError>;

    /// Finds one investment.
    async fn find_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Option<Investment>, StoreError>;

    /// Finds the investment attached to a goal.
    async fn find_investment_for_goal(
        &self,
        user_id: UserId,
        goal_id: GoalId,
    ) -> Result<Option<Investment>, StoreError>;

    /// Inserts an investment. Fails with [`StoreError::Conflict`] if the goal already has one.
    async fn insert_investment(
        &self,
        user_id: UserId,
        input: NewInvestment,
    ) -> Result<Investment, StoreError>;

    /// Replaces the split. Returns `None` when the row is absent or not owned.
    async fn update_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
        split: Split,
    ) -> Result<Option<Investment>, StoreError>;

    /// Deletes an investment. Returns `false` when nothing was deleted.
    async fn delete_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<bool, StoreError>;
}

/// Cash-flow transaction persistence, keyed by `(user_id, timestamp)`.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Lists transactions matching the filter, newest first.
    async fn list_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError>;

    /// Inserts a transaction. Fails with [`StoreError::Conflict`] on a duplicate timestamp.
    async fn insert_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        input: NewTransaction,
    ) -> Result<Transaction, StoreError>;

    /// Applies a partial update. Returns `None` when no such transaction exists.
    async fn update_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        changes: TransactionUpdate,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Deletes a transaction. Returns `false` when nothing was deleted.
    async fn delete_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

/// Baby-step progress persistence. At most one row per user.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Finds the user's progress row.
    async fn find_progress(&self, user_id: UserId) -> Result<Option<Progress>, StoreError>;

    /// Inserts the row. Fails with [`StoreError::Conflict`] if it already exists.
    async fn insert_progress(&self, user_id: UserId, step: i32) -> Result<Progress, StoreError>;

    /// Updates the row in place, creating it first if missing.
    async fn upsert_progress(&self, user_id: UserId, step: i32) -> Result<Progress, StoreError>;
}

/// Backend reachability, reported by the health endpoint.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Round-trips to the backend.
    async fn ping(&self) -> Result<(), StoreError>;
}
