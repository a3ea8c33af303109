//! In-memory store and scripted reasoning client for tests.
//!
//! `MemoryStore` implements every store trait with the same ownership and
//! uniqueness rules the database enforces.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nestegg_shared::{CategoryId, GoalId, InvestmentId, ProgressId, UserId};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::advisor::{GenerationRequest, ReasoningClient, ReasoningError};
use crate::budget::{Category, CategoryUpdate, NewCategory};
use crate::goal::{Goal, GoalUpdate, NewGoal};
use crate::investment::{Investment, NewInvestment, Split};
use crate::ledger::{NewTransaction, Transaction, TransactionFilter, TransactionUpdate};
use crate::progress::Progress;
use crate::store::{
    CategoryStore, GoalStore, InvestmentStore, MAX_STORED_AMOUNT, ProgressStore, StoreError,
    StoreHealth, TransactionStore,
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    goals: Vec<Goal>,
    investments: Vec<Investment>,
    transactions: Vec<Transaction>,
    progress: Vec<Progress>,
    increments_left: Option<usize>,
    offline: bool,
}

/// All tables behind one lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `n` more goal increments succeed, then fails every later one.
    pub async fn fail_increments_after(&self, n: usize) {
        self.tables.lock().await.increments_left = Some(n);
    }

    /// Makes [`StoreHealth::ping`] fail.
    pub async fn go_offline(&self) {
        self.tables.lock().await.offline = true;
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.tables.lock().await.offline {
            return Err(StoreError::Backend("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self, user_id: UserId) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_category_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.lock().await;
        let wanted = name.to_lowercase();
        Ok(tables
            .categories
            .iter()
            .find(|c| c.user_id == user_id && c.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn insert_category(
        &self,
        user_id: UserId,
        input: NewCategory,
    ) -> Result<Category, StoreError> {
        let mut tables = self.tables.lock().await;
        let wanted = input.name.to_lowercase();
        if tables
            .categories
            .iter()
            .any(|c| c.user_id == user_id && c.name.to_lowercase() == wanted)
        {
            return Err(StoreError::Conflict("user_categories_user_id_lower_name".into()));
        }

        let now = Utc::now();
        let category = Category {
            id: CategoryId::new(),
            user_id,
            name: input.name,
            size: input.size,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        changes: CategoryUpdate,
    ) -> Result<Option<Category>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(category) = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(size) = changes.size {
            category.size = size;
        }
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.categories.len();
        tables
            .categories
            .retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(tables.categories.len() != before)
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn list_goals(&self, user_id: UserId) -> Result<Vec<Goal>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .goals
            .iter()
            .rev()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_goal(&self, user_id: UserId, id: GoalId) -> Result<Option<Goal>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .goals
            .iter()
            .find(|g| g.id == id && g.user_id == user_id)
            .cloned())
    }

    async fn find_goals(&self, user_id: UserId, ids: &[GoalId]) -> Result<Vec<Goal>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .goals
            .iter()
            .filter(|g| g.user_id == user_id && ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn insert_goal(&self, user_id: UserId, input: NewGoal) -> Result<Goal, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let goal = Goal {
            id: GoalId::new(),
            user_id,
            name: input.name,
            description: input.description,
            target_amount: input.target_amount,
            current_amount: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };
        tables.goals.push(goal.clone());
        Ok(goal)
    }

    async fn update_goal(
        &self,
        user_id: UserId,
        id: GoalId,
        changes: GoalUpdate,
    ) -> Result<Option<Goal>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(goal) = tables
            .goals
            .iter_mut()
            .find(|g| g.id == id && g.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            goal.name = name;
        }
        if let Some(description) = changes.description {
            goal.description = description;
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = changes.current_amount {
            goal.current_amount = current;
        }
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }

    async fn delete_goal(&self, user_id: UserId, id: GoalId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.goals.len();
        tables.goals.retain(|g| !(g.id == id && g.user_id == user_id));
        let deleted = tables.goals.len() != before;
        if deleted {
            tables.investments.retain(|i| i.goal_id != id);
        }
        Ok(deleted)
    }

    async fn increment_current_amount(
        &self,
        user_id: UserId,
        id: GoalId,
        amount: Decimal,
    ) -> Result<Option<Goal>, StoreError> {
        let mut tables = self.tables.lock().await;
        match tables.increments_left {
            Some(0) => return Err(StoreError::Backend("injected increment failure".into())),
            Some(n) => tables.increments_left = Some(n - 1),
            None => {}
        }

        let Some(goal) = tables
            .goals
            .iter_mut()
            .find(|g| g.id == id && g.user_id == user_id)
        else {
            return Ok(None);
        };
        goal.current_amount = goal
            .current_amount
            .checked_add(amount)
            .filter(|total| *total <= MAX_STORED_AMOUNT)
            .ok_or_else(|| StoreError::Backend("numeric field overflow".into()))?;
        goal.updated_at = Utc::now();
        Ok(Some(goal.clone()))
    }
}

#[async_trait]
impl InvestmentStore for MemoryStore {
    async fn list_investments(&self, user_id: UserId) -> Result<Vec<Investment>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .investments
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Option<Investment>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .investments
            .iter()
            .find(|i| i.id == id && i.user_id == user_id)
            .cloned())
    }

    async fn find_investment_for_goal(
        &self,
        user_id: UserId,
        goal_id: GoalId,
    ) -> Result<Option<Investment>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .investments
            .iter()
            .find(|i| i.goal_id == goal_id && i.user_id == user_id)
            .cloned())
    }

    async fn insert_investment(
        &self,
        user_id: UserId,
        input: NewInvestment,
    ) -> Result<Investment, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.investments.iter().any(|i| i.goal_id == input.goal_id) {
            return Err(StoreError::Conflict("user_investments_goal_id_key".into()));
        }

        let now = Utc::now();
        let investment = Investment {
            id: InvestmentId::new(),
            user_id,
            goal_id: input.goal_id,
            percentage_debt: input.split.percentage_debt(),
            percentage_equity: input.split.percentage_equity(),
            created_at: now,
            updated_at: now,
        };
        tables.investments.push(investment.clone());
        Ok(investment)
    }

    async fn update_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
        split: Split,
    ) -> Result<Option<Investment>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(investment) = tables
            .investments
            .iter_mut()
            .find(|i| i.id == id && i.user_id == user_id)
        else {
            return Ok(None);
        };
        investment.percentage_debt = split.percentage_debt();
        investment.percentage_equity = split.percentage_equity();
        investment.updated_at = Utc::now();
        Ok(Some(investment.clone()))
    }

    async fn delete_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.investments.len();
        tables
            .investments
            .retain(|i| !(i.id == id && i.user_id == user_id));
        Ok(tables.investments.len() != before)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let tables = self.tables.lock().await;
        let mut found: Vec<Transaction> = tables
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(found)
    }

    async fn insert_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        input: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .transactions
            .iter()
            .any(|t| t.user_id == user_id && t.timestamp == timestamp)
        {
            return Err(StoreError::Conflict("user_transactions_pkey".into()));
        }

        let tx = Transaction {
            user_id,
            timestamp,
            category: input.category,
            amount: input.amount,
        };
        tables.transactions.push(tx.clone());
        Ok(tx)
    }

    async fn update_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        changes: TransactionUpdate,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(tx) = tables
            .transactions
            .iter_mut()
            .find(|t| t.user_id == user_id && t.timestamp == timestamp)
        else {
            return Ok(None);
        };
        if let Some(category) = changes.category {
            tx.category = category;
        }
        if let Some(amount) = changes.amount {
            tx.amount = amount;
        }
        Ok(Some(tx.clone()))
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.transactions.len();
        tables
            .transactions
            .retain(|t| !(t.user_id == user_id && t.timestamp == timestamp));
        Ok(tables.transactions.len() != before)
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn find_progress(&self, user_id: UserId) -> Result<Option<Progress>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .progress
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert_progress(&self, user_id: UserId, step: i32) -> Result<Progress, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.progress.iter().any(|p| p.user_id == user_id) {
            return Err(StoreError::Conflict("user_progress_user_id_key".into()));
        }

        let now = Utc::now();
        let progress = Progress {
            id: ProgressId::new(),
            user_id,
            current_step: step,
            created_at: now,
            updated_at: now,
        };
        tables.progress.push(progress.clone());
        Ok(progress)
    }

    async fn upsert_progress(&self, user_id: UserId, step: i32) -> Result<Progress, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        if let Some(existing) = tables.progress.iter_mut().find(|p| p.user_id == user_id) {
            existing.current_step = step;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let progress = Progress {
            id: ProgressId::new(),
            user_id,
            current_step: step,
            created_at: now,
            updated_at: now,
        };
        tables.progress.push(progress.clone());
        Ok(progress)
    }
}

/// Replays canned replies in order and records every request.
///
/// Once the script runs out every call fails with `EmptyResponse`.
pub struct ScriptedReasoner {
    replies: Mutex<VecDeque<Result<String, ReasoningError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedReasoner {
    /// Creates a reasoner that answers with `replies`, first to last.
    #[must_use]
    pub fn new(replies: Vec<Result<String, ReasoningError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ReasoningClient for ScriptedReasoner {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ReasoningError> {
        self.requests.lock().await.push(request.clone());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(ReasoningError::EmptyResponse))
    }
}
