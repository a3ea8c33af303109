//! Transaction repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nestegg_core::ledger::{
    FlowDirection, NewTransaction, Transaction, TransactionFilter, TransactionUpdate,
};
use nestegg_core::store::{StoreError, TransactionStore};
use nestegg_shared::UserId;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{store_err, utc};
use crate::entities::user_transactions;

/// Transaction repository backed by `user_transactions`.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = user_transactions::Entity::find_by_id((user_id.into_inner(), timestamp.into()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Transaction::from))
    }
}

impl From<user_transactions::Model> for Transaction {
    fn from(m: user_transactions::Model) -> Self {
        Self {
            user_id: UserId::from_uuid(m.user_id),
            timestamp: utc(m.timestamp),
            category: m.category,
            amount: m.amount,
        }
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn list_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut query = user_transactions::Entity::find()
            .filter(user_transactions::Column::UserId.eq(user_id.into_inner()));

        query = match filter.direction {
            Some(FlowDirection::Inflow) => {
                query.filter(user_transactions::Column::Amount.gt(Decimal::ZERO))
            }
            Some(FlowDirection::Outflow) => {
                query.filter(user_transactions::Column::Amount.lt(Decimal::ZERO))
            }
            None => query,
        };
        if let Some(from) = filter.from {
            query = query.filter(user_transactions::Column::Timestamp.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(user_transactions::Column::Timestamp.lte(to));
        }

        let rows = query
            .order_by_desc(user_transactions::Column::Timestamp)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn insert_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        input: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let model = user_transactions::ActiveModel {
            user_id: Set(user_id.into_inner()),
            timestamp: Set(timestamp.into()),
            category: Set(input.category),
            amount: Set(input.amount),
        };
        model
            .insert(&self.db)
            .await
            .map(Transaction::from)
            .map_err(store_err)
    }

    async fn update_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        changes: TransactionUpdate,
    ) -> Result<Option<Transaction>, StoreError> {
        if changes.category.is_none() && changes.amount.is_none() {
            return self.find(user_id, timestamp).await;
        }

        let mut update = user_transactions::Entity::update_many()
            .filter(user_transactions::Column::UserId.eq(user_id.into_inner()))
            .filter(user_transactions::Column::Timestamp.eq(timestamp));
        if let Some(category) = changes.category {
            update = update.col_expr(user_transactions::Column::Category, Expr::value(category));
        }
        if let Some(amount) = changes.amount {
            update = update.col_expr(user_transactions::Column::Amount, Expr::value(amount));
        }

        let rows = update.exec_with_returning(&self.db).await.map_err(store_err)?;
        Ok(rows.into_iter().next().map(Transaction::from))
    }

    async fn delete_transaction(
        &self,
        user_id: UserId,
        timestamp: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = user_transactions::Entity::delete_many()
            .filter(user_transactions::Column::UserId.eq(user_id.into_inner()))
            .filter(user_transactions::Column::Timestamp.eq(timestamp))
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }
}
