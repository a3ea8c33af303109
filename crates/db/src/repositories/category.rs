//! Category repository.

use async_trait::async_trait;
use chrono::Utc;
use nestegg_core::budget::{Category, CategoryUpdate, NewCategory};
use nestegg_core::store::{CategoryStore, StoreError};
use nestegg_shared::{CategoryId, UserId};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{store_err, utc};
use crate::entities::user_categories;

/// Category repository backed by `user_categories`.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<user_categories::Model> for Category {
    fn from(m: user_categories::Model) -> Self {
        Self {
            id: CategoryId::from_uuid(m.id),
            user_id: UserId::from_uuid(m.user_id),
            name: m.name,
            size: m.size,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn list_categories(&self, user_id: UserId) -> Result<Vec<Category>, StoreError> {
        let rows = user_categories::Entity::find()
            .filter(user_categories::Column::UserId.eq(user_id.into_inner()))
            .order_by_asc(user_categories::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_category_by_name(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<Option<Category>, StoreError> {
        let row = user_categories::Entity::find()
            .filter(user_categories::Column::UserId.eq(user_id.into_inner()))
            .filter(
                Expr::expr(Func::lower(Expr::col(user_categories::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Category::from))
    }

    async fn insert_category(
        &self,
        user_id: UserId,
        input: NewCategory,
    ) -> Result<Category, StoreError> {
        let now = Utc::now().into();
        let model = user_categories::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id.into_inner()),
            name: Set(input.name),
            size: Set(input.size),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await.map(Category::from).map_err(store_err)
    }

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        changes: CategoryUpdate,
    ) -> Result<Option<Category>, StoreError> {
        let mut update = user_categories::Entity::update_many()
            .col_expr(user_categories::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user_categories::Column::Id.eq(id.into_inner()))
            .filter(user_categories::Column::UserId.eq(user_id.into_inner()));
        if let Some(name) = changes.name {
            update = update.col_expr(user_categories::Column::Name, Expr::value(name));
        }
        if let Some(size) = changes.size {
            update = update.col_expr(user_categories::Column::Size, Expr::value(size));
        }

        let rows = update.exec_with_returning(&self.db).await.map_err(store_err)?;
        Ok(rows.into_iter().next().map(Category::from))
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<bool, StoreError> {
        let result = user_categories::Entity::delete_many()
            .filter(user_categories::Column::Id.eq(id.into_inner()))
            .filter(user_categories::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }
}
