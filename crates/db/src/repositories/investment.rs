//! Investment repository.

use async_trait::async_trait;
use chrono::Utc;
use nestegg_core::investment::{Investment, NewInvestment, Split};
use nestegg_core::store::{InvestmentStore, StoreError};
use nestegg_shared::{GoalId, InvestmentId, UserId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{store_err, utc};
use crate::entities::user_investments;

/// Investment repository backed by `user_investments`.
///
/// `UNIQUE (goal_id)` backs the one-investment-per-goal rule.
#[derive(Debug, Clone)]
pub struct InvestmentRepository {
    db: DatabaseConnection,
}

impl InvestmentRepository {
    /// Creates a new investment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<user_investments::Model> for Investment {
    fn from(m: user_investments::Model) -> Self {
        Self {
            id: InvestmentId::from_uuid(m.id),
            user_id: UserId::from_uuid(m.user_id),
            goal_id: GoalId::from_uuid(m.goal_id),
            percentage_debt: m.percentage_debt,
            percentage_equity: m.percentage_equity,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        }
    }
}

#[async_trait]
impl InvestmentStore for InvestmentRepository {
    async fn list_investments(&self, user_id: UserId) -> Result<Vec<Investment>, StoreError> {
        let rows = user_investments::Entity::find()
            .filter(user_investments::Column::UserId.eq(user_id.into_inner()))
            .order_by_desc(user_investments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Investment::from).collect())
    }

    async fn find_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<Option<Investment>, StoreError> {
        let row = user_investments::Entity::find_by_id(id.into_inner())
            .filter(user_investments::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Investment::from))
    }

    async fn find_investment_for_goal(
        &self,
        user_id: UserId,
        goal_id: GoalId,
    ) -> Result<Option<Investment>, StoreError> {
        let row = user_investments::Entity::find()
            .filter(user_investments::Column::GoalId.eq(goal_id.into_inner()))
            .filter(user_investments::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Investment::from))
    }

    async fn insert_investment(
        &self,
        user_id: UserId,
        input: NewInvestment,
    ) -> Result<Investment, StoreError> {
        let now = Utc::now().into();
        let model = user_investments::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id.into_inner()),
            goal_id: Set(input.goal_id.into_inner()),
            percentage_debt: Set(input.split.percentage_debt()),
            percentage_equity: Set(input.split.percentage_equity()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await.map(Investment::from).map_err(store_err)
    }

    async fn update_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
        split: Split,
    ) -> Result<Option<Investment>, StoreError> {
        let rows = user_investments::Entity::update_many()
            .col_expr(
                user_investments::Column::PercentageDebt,
                Expr::value(split.percentage_debt()),
            )
            .col_expr(
                user_investments::Column::PercentageEquity,
                Expr::value(split.percentage_equity()),
            )
            .col_expr(user_investments::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_investments::Column::Id.eq(id.into_inner()))
            .filter(user_investments::Column::UserId.eq(user_id.into_inner()))
            .exec_with_returning(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().next().map(Investment::from))
    }

    async fn delete_investment(
        &self,
        user_id: UserId,
        id: InvestmentId,
    ) -> Result<bool, StoreError> {
        let result = user_investments::Entity::delete_many()
            .filter(user_investments::Column::Id.eq(id.into_inner()))
            .filter(user_investments::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }
}
