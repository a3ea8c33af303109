//! Baby-step progress tracking. One row per user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nestegg_shared::{AppError, ProgressId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::store::{ProgressStore, StoreError};

/// The user's position in the staged plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Row ID.
    pub id: ProgressId,
    /// Owner.
    pub user_id: UserId,
    /// Current step, starting at 1.
    pub current_step: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Progress errors.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// Step below 1.
    #[error("current_step must be a number greater than or equal to 1")]
    InvalidStep,

    /// The user already has a progress row.
    #[error("Progress already exists for this user. Use PUT to update.")]
    AlreadyExists,

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ProgressError> for AppError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::InvalidStep => Self::Validation(err.to_string()),
            ProgressError::AlreadyExists => Self::Conflict(err.to_string()),
            ProgressError::Store(e) => e.into(),
        }
    }
}

/// Progress service.
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    /// Creates a new progress service.
    #[must_use]
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Returns the user's progress, if any.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Progress>, ProgressError> {
        Ok(self.store.find_progress(user_id).await?)
    }

    /// Starts tracking progress.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStep` for a step below 1 and `AlreadyExists` when the
    /// user already has a row.
    pub async fn create(&self, user_id: UserId, step: i32) -> Result<Progress, ProgressError> {
        validate_step(step)?;
        if self.store.find_progress(user_id).await?.is_some() {
            return Err(ProgressError::AlreadyExists);
        }

        let progress = self
            .store
            .insert_progress(user_id, step)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => ProgressError::AlreadyExists,
                other => ProgressError::Store(other),
            })?;
        info!(user_id = %user_id, step, "Progress started");
        Ok(progress)
    }

    /// Sets the current step, creating the row if needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStep` for a step below 1.
    pub async fn put(&self, user_id: UserId, step: i32) -> Result<Progress, ProgressError> {
        validate_step(step)?;
        let progress = self.store.upsert_progress(user_id, step).await?;
        info!(user_id = %user_id, step, "Progress updated");
        Ok(progress)
    }
}

fn validate_step(step: i32) -> Result<(), ProgressError> {
    if step < 1 {
        Err(ProgressError::InvalidStep)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn service() -> ProgressService {
        ProgressService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_then_conflict() {
        let service = service();
        let user = UserId::new();

        assert!(service.get(user).await.unwrap().is_none());
        let progress = service.create(user, 1).await.unwrap();
        assert_eq!(progress.current_step, 1);

        let err = service.create(user, 2).await.unwrap_err();
        assert!(matches!(err, ProgressError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_put_upserts_in_place() {
        let service = service();
        let user = UserId::new();

        let first = service.put(user, 2).await.unwrap();
        let second = service.put(user, 3).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(service.get(user).await.unwrap().unwrap().current_step, 3);
    }

    #[tokio::test]
    async fn test_step_must_be_positive() {
        let service = service();
        let user = UserId::new();
        assert!(matches!(service.create(user, 0).await, Err(ProgressError::InvalidStep)));
        assert!(matches!(service.put(user, -3).await, Err(ProgressError::InvalidStep)));
        assert!(service.get(user).await.unwrap().is_none());
    }
}
