//! Progress repository.

use async_trait::async_trait;
use chrono::Utc;
use nestegg_core::progress::Progress;
use nestegg_core::store::{ProgressStore, StoreError};
use nestegg_shared::{ProgressId, UserId};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::{store_err, utc};
use crate::entities::user_progress;

/// Progress repository backed by `user_progress`.
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    db: DatabaseConnection,
}

impl ProgressRepository {
    /// Creates a new progress repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<user_progress::Model> for Progress {
    fn from(m: user_progress::Model) -> Self {
        Self {
            id: ProgressId::from_uuid(m.id),
            user_id: UserId::from_uuid(m.user_id),
            current_step: m.current_step,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        }
    }
}

fn new_row(user_id: UserId, step: i32) -> user_progress::ActiveModel {
    let now = Utc::now().into();
    user_progress::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(user_id.into_inner()),
        current_step: Set(step),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[async_trait]
impl ProgressStore for ProgressRepository {
    async fn find_progress(&self, user_id: UserId) -> Result<Option<Progress>, StoreError> {
        let row = user_progress::Entity::find()
            .filter(user_progress::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(row.map(Progress::from))
    }

    async fn insert_progress(&self, user_id: UserId, step: i32) -> Result<Progress, StoreError> {
        new_row(user_id, step)
            .insert(&self.db)
            .await
            .map(Progress::from)
            .map_err(store_err)
    }

    async fn upsert_progress(&self, user_id: UserId, step: i32) -> Result<Progress, StoreError> {
        // ON CONFLICT (user_id) keeps the original id and created_at.
        let row = user_progress::Entity::insert(new_row(user_id, step))
            .on_conflict(
                OnConflict::column(user_progress::Column::UserId)
                    .update_columns([
                        user_progress::Column::CurrentStep,
                        user_progress::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(store_err)?;
        Ok(Progress::from(row))
    }
}
