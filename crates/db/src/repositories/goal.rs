//! Goal repository.

use async_trait::async_trait;
use chrono::Utc;
use nestegg_core::goal::{Goal, GoalUpdate, NewGoal};
use nestegg_core::store::{GoalStore, StoreError};
use nestegg_shared::{GoalId, UserId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::{store_err, utc};
use crate::entities::user_goals;

/// Goal repository backed by `user_goals`.
///
/// Deleting a goal removes its investment through `ON DELETE CASCADE`.
#[derive(Debug, Clone)]
pub struct GoalRepository {
    db: DatabaseConnection,
}

impl GoalRepository {
    /// Creates a new goal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<user_goals::Model> for Goal {
    fn from(m: user_goals::Model) -> Self {
        Self {
            id: GoalId::from_uuid(m.id),
            user_id: UserId::from_uuid(m.user_id),
            name: m.name,
            description: m.description,
            target_amount: m.target_amount,
            current_amount: m.current_amount,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        }
    }
}

#[async_trait]
impl GoalStore for GoalRepository {
    async fn list_goals(&self, user_id: UserId) -> Result<Vec<Goal>, StoreError> {
        let rows = user_goals::Entity::find()
            .filter(user_goals::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(user_goals::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    async fn find_goal(&self, user_id: UserId, id: GoalId) -> Result<Option<Goal>, StoreError> {
        let row = user_goals::Entity::find_by_id(id.into_inner())
            .filter(user_goals::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Goal::from))
    }

    async fn find_goals(&self, user_id: UserId, ids: &[GoalId]) -> Result<Vec<Goal>, StoreError> {
        let rows = user_goals::Entity::find()
            .filter(user_goals::Column::UserId.eq(user_id.into_inner()))
            .filter(user_goals::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    async fn insert_goal(&self, user_id: UserId, input: NewGoal) -> Result<Goal, StoreError> {
        let now = Utc::now().into();
        let model = user_goals::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id.into_inner()),
            name: Set(input.name),
            description: Set(input.description),
            target_amount: Set(input.target_amount),
            current_amount: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await.map(Goal::from).map_err(store_err)
    }

    async fn update_goal(
        &self,
        user_id: UserId,
        id: GoalId,
        changes: GoalUpdate,
    ) -> Result<Option<Goal>, StoreError> {
        let mut update = user_goals::Entity::update_many()
            .col_expr(user_goals::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_goals::Column::Id.eq(id.into_inner()))
            .filter(user_goals::Column::UserId.eq(user_id.into_inner()));
        if let Some(name) = changes.name {
            update = update.col_expr(user_goals::Column::Name, Expr::value(name));
        }
        if let Some(description) = changes.description {
            update = update.col_expr(user_goals::Column::Description, Expr::value(description));
        }
        if let Some(target) = changes.target_amount {
            update = update.col_expr(user_goals::Column::TargetAmount, Expr::value(target));
        }
        if let Some(current) = changes.current_amount {
            update = update.col_expr(user_goals::Column::CurrentAmount, Expr::value(current));
        }

        let rows = update.exec_with_returning(&self.db).await.map_err(store_err)?;
        Ok(rows.into_iter().next().map(Goal::from))
    }

    async fn delete_goal(&self, user_id: UserId, id: GoalId) -> Result<bool, StoreError> {
        let result = user_goals::Entity::delete_many()
            .filter(user_goals::Column::Id.eq(id.into_inner()))
            .filter(user_goals::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_current_amount(
        &self,
        user_id: UserId,
        id: GoalId,
        amount: Decimal,
    ) -> Result<Option<Goal>, StoreError> {
        // UPDATE ... SET current_amount = current_amount + $1, so the base is
        // always the committed value.
        let rows = user_goals::Entity::update_many()
            .col_expr(
                user_goals::Column::CurrentAmount,
                Expr::col(user_goals::Column::CurrentAmount).add(amount),
            )
            .col_expr(user_goals::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_goals::Column::Id.eq(id.into_inner()))
            .filter(user_goals::Column::UserId.eq(user_id.into_inner()))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_err)?;

        debug!(goal_id = %id, amount = %amount, updated = rows.len(), "Goal incremented");
        Ok(rows.into_iter().next().map(Goal::from))
    }
}
