//! Goal service.

use std::sync::Arc;

use nestegg_shared::{GoalId, UserId};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{error, info};

use super::error::GoalError;
use super::types::{CreatedGoal, Goal, GoalUpdate, NewGoal};
use crate::advisor::{ReasoningClient, SplitAdvisor};
use crate::investment::InvestmentManager;
use crate::store::{GoalStore, InvestmentStore};

/// Goal service: validation, creation with split advice, and CRUD.
pub struct GoalService {
    goals: Arc<dyn GoalStore>,
    investments: InvestmentManager,
    advisor: SplitAdvisor,
}

impl GoalService {
    /// Creates a new goal service.
    #[must_use]
    pub fn new(
        goals: Arc<dyn GoalStore>,
        investments: Arc<dyn InvestmentStore>,
        reasoning: Arc<dyn ReasoningClient>,
    ) -> Self {
        Self {
            investments: InvestmentManager::new(goals.clone(), investments),
            advisor: SplitAdvisor::new(reasoning),
            goals,
        }
    }

    /// Lists the user's goals, newest first.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Goal>, GoalError> {
        Ok(self.goals.list_goals(user_id).await?)
    }

    /// Fetches one goal.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the goal is absent or not owned.
    pub async fn get(&self, user_id: UserId, id: GoalId) -> Result<Goal, GoalError> {
        self.goals
            .find_goal(user_id, id)
            .await?
            .ok_or(GoalError::NotFound(id))
    }

    /// Creates a goal and its investment record.
    ///
    /// The goal starts at `current_amount = 0`. Its split comes from the
    /// split advisor, which never fails. If the investment cannot be stored
    /// the goal is removed again so no goal exists without a split.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub async fn create(
        &self,
        user_id: UserId,
        input: NewGoal,
        answers: Option<&Value>,
    ) -> Result<CreatedGoal, GoalError> {
        let input = NewGoal {
            name: normalize_name(&input.name)?,
            description: normalize_description(input.description),
            target_amount: validate_target(input.target_amount)?,
        };

        let goal = self.goals.insert_goal(user_id, input).await?;
        info!(user_id = %user_id, goal_id = %goal.id, target = %goal.target_amount, "Goal created");

        let proposal = self.advisor.propose(&goal, answers).await;
        match self.investments.attach(user_id, goal.id, proposal.split()).await {
            Ok(investment) => Ok(CreatedGoal { goal, investment }),
            Err(e) => {
                error!(user_id = %user_id, goal_id = %goal.id, error = %e, "Failed to attach investment, removing goal");
                if let Err(cleanup) = self.goals.delete_goal(user_id, goal.id).await {
                    error!(goal_id = %goal.id, error = %cleanup, "Failed to remove goal without investment");
                }
                Err(e.into())
            }
        }
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad fields and `NotFound` when the goal
    /// is absent or not owned.
    pub async fn update(
        &self,
        user_id: UserId,
        id: GoalId,
        changes: GoalUpdate,
    ) -> Result<Goal, GoalError> {
        let changes = GoalUpdate {
            name: changes.name.as_deref().map(normalize_name).transpose()?,
            description: changes.description.map(normalize_description),
            target_amount: changes.target_amount.map(validate_target).transpose()?,
            current_amount: changes.current_amount.map(validate_current).transpose()?,
        };

        let goal = self
            .goals
            .update_goal(user_id, id, changes)
            .await?
            .ok_or(GoalError::NotFound(id))?;
        info!(user_id = %user_id, goal_id = %id, "Goal updated");
        Ok(goal)
    }

    /// Deletes a goal and its investment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing was deleted.
    pub async fn delete(&self, user_id: UserId, id: GoalId) -> Result<(), GoalError> {
        if self.goals.delete_goal(user_id, id).await? {
            info!(user_id = %user_id, goal_id = %id, "Goal deleted");
            Ok(())
        } else {
            Err(GoalError::NotFound(id))
        }
    }
}

fn normalize_name(raw: &str) -> Result<String, GoalError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GoalError::EmptyName);
    }
    Ok(name.to_string())
}

fn normalize_description(raw: Option<String>) -> Option<String> {
    raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}

fn validate_target(amount: Decimal) -> Result<Decimal, GoalError> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(GoalError::InvalidTarget)
    }
}

fn validate_current(amount: Decimal) -> Result<Decimal, GoalError> {
    if amount < Decimal::ZERO {
        Err(GoalError::NegativeCurrent)
    } else {
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::ReasoningError;
    use crate::memory::{MemoryStore, ScriptedReasoner};
    use rust_decimal_macros::dec;

    fn service(replies: Vec<Result<String, ReasoningError>>) -> (Arc<MemoryStore>, GoalService) {
        let store = Arc::new(MemoryStore::new());
        let service = GoalService::new(
            store.clone(),
            store.clone(),
            Arc::new(ScriptedReasoner::new(replies)),
        );
        (store, service)
    }

    fn new_goal(name: &str, target: Decimal) -> NewGoal {
        NewGoal {
            name: name.to_string(),
            description: Some("  ".to_string()),
            target_amount: target,
        }
    }

    #[tokio::test]
    async fn test_create_starts_at_zero_with_proposed_split() {
        let (store, service) = service(vec![Ok(
            r#"{"percentage_equity": 85, "percentage_debt": 15}"#.to_string(),
        )]);
        let user = UserId::new();

        let created = service
            .create(user, new_goal(" Retirement ", dec!(500000)), None)
            .await
            .unwrap();

        assert_eq!(created.goal.name, "Retirement");
        assert_eq!(created.goal.description, None);
        assert_eq!(created.goal.current_amount, Decimal::ZERO);
        assert_eq!(created.investment.goal_id, created.goal.id);
        assert_eq!(created.investment.percentage_equity, dec!(85));
        assert_eq!(created.investment.percentage_debt, dec!(15));
        assert!(
            store
                .find_investment_for_goal(user, created.goal.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_create_survives_reasoning_outage() {
        let (_, service) = service(vec![Err(ReasoningError::Timeout)]);
        let created = service
            .create(UserId::new(), new_goal("Car", dec!(20000)), None)
            .await
            .unwrap();
        assert_eq!(created.investment.percentage_equity, dec!(60));
        assert_eq!(created.investment.percentage_debt, dec!(40));
    }

    #[tokio::test]
    async fn test_create_validation() {
        let (store, service) = service(vec![]);
        let user = UserId::new();

        let err = service.create(user, new_goal("", dec!(1)), None).await.unwrap_err();
        assert!(matches!(err, GoalError::EmptyName));

        let err = service.create(user, new_goal("Trip", dec!(0)), None).await.unwrap_err();
        assert!(matches!(err, GoalError::InvalidTarget));

        assert!(store.list_goals(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_fields() {
        let (_, service) = service(vec![]);
        let user = UserId::new();
        let goal = service
            .create(user, new_goal("Trip", dec!(3000)), None)
            .await
            .unwrap()
            .goal;

        let updated = service
            .update(
                user,
                goal.id,
                GoalUpdate {
                    description: Some(Some(" Japan in spring ".into())),
                    current_amount: Some(dec!(250)),
                    ..GoalUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Japan in spring"));
        assert_eq!(updated.current_amount, dec!(250));
        assert_eq!(updated.target_amount, dec!(3000));

        let err = service
            .update(
                user,
                goal.id,
                GoalUpdate {
                    current_amount: Some(dec!(-1)),
                    ..GoalUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GoalError::NegativeCurrent));

        let err = service
            .update(UserId::new(), goal.id, GoalUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GoalError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_investment() {
        let (store, service) = service(vec![]);
        let user = UserId::new();
        let goal = service
            .create(user, new_goal("Trip", dec!(3000)), None)
            .await
            .unwrap()
            .goal;

        service.delete(user, goal.id).await.unwrap();
        assert!(store.list_investments(user).await.unwrap().is_empty());

        let err = service.delete(user, goal.id).await.unwrap_err();
        assert!(matches!(err, GoalError::NotFound(_)));
    }
}
