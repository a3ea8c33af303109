//! Category service: validation and duplicate detection around the store.

use std::sync::Arc;

use nestegg_shared::{CategoryId, UserId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::CategoryError;
use super::types::{Category, CategoryUpdate, NewCategory};
use crate::store::{CategoryStore, StoreError};

/// Category service.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    /// Creates a new category service.
    #[must_use]
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Lists the user's categories.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Store` on storage failure.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<Category>, CategoryError> {
        Ok(self.store.list_categories(user_id).await?)
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName`/`NegativeSize` for invalid input and `DuplicateName`
    /// when the user already has a category with the same name in any case.
    pub async fn create(
        &self,
        user_id: UserId,
        input: NewCategory,
    ) -> Result<Category, CategoryError> {
        let name = normalize_name(&input.name)?;
        validate_size(input.size)?;

        if self.store.find_category_by_name(user_id, &name).await?.is_some() {
            return Err(CategoryError::DuplicateName(name));
        }

        let category = self
            .store
            .insert_category(
                user_id,
                NewCategory {
                    name: name.clone(),
                    size: input.size,
                },
            )
            .await
            .map_err(|e| duplicate_or_store(e, &name))?;

        info!(user_id = %user_id, category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the category is absent or owned by someone else.
    pub async fn update(
        &self,
        user_id: UserId,
        id: CategoryId,
        changes: CategoryUpdate,
    ) -> Result<Category, CategoryError> {
        let name = changes.name.as_deref().map(normalize_name).transpose()?;
        if let Some(size) = changes.size {
            validate_size(size)?;
        }

        if let Some(name) = &name {
            if let Some(existing) = self.store.find_category_by_name(user_id, name).await? {
                if existing.id != id {
                    return Err(CategoryError::DuplicateName(name.clone()));
                }
            }
        }

        let changes = CategoryUpdate {
            name: name.clone(),
            size: changes.size,
        };
        self.store
            .update_category(user_id, id, changes)
            .await
            .map_err(|e| duplicate_or_store(e, name.as_deref().unwrap_or_default()))?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing was deleted.
    pub async fn delete(&self, user_id: UserId, id: CategoryId) -> Result<(), CategoryError> {
        if self.store.delete_category(user_id, id).await? {
            info!(user_id = %user_id, category_id = %id, "Category deleted");
            Ok(())
        } else {
            Err(CategoryError::NotFound(id))
        }
    }
}

fn normalize_name(raw: &str) -> Result<String, CategoryError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CategoryError::EmptyName);
    }
    Ok(name.to_string())
}

fn validate_size(size: Decimal) -> Result<(), CategoryError> {
    if size < Decimal::ZERO {
        return Err(CategoryError::NegativeSize);
    }
    Ok(())
}

// The unique index can still fire when two requests race past the pre-check.
fn duplicate_or_store(err: StoreError, name: &str) -> CategoryError {
    match err {
        StoreError::Conflict(_) => CategoryError::DuplicateName(name.to_string()),
        other => CategoryError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use rust_decimal_macros::dec;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryStore::new()))
    }

    fn new_category(name: &str, size: Decimal) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            size,
        }
    }

    #[tokio::test]
    async fn test_create_trims_name() {
        let service = service();
        let user = UserId::new();

        let category = service
            .create(user, new_category("  Groceries ", dec!(400)))
            .await
            .unwrap();

        assert_eq!(category.name, "Groceries");
        assert_eq!(category.size, dec!(400));
        assert_eq!(category.user_id, user);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_and_negative_size() {
        let service = service();
        let user = UserId::new();

        let err = service.create(user, new_category("   ", dec!(1))).await.unwrap_err();
        assert!(matches!(err, CategoryError::EmptyName));

        let err = service.create(user, new_category("Rent", dec!(-1))).await.unwrap_err();
        assert!(matches!(err, CategoryError::NegativeSize));

        assert!(service.list(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_size_is_allowed() {
        let service = service();
        let category = service
            .create(UserId::new(), new_category("Gifts", Decimal::ZERO))
            .await
            .unwrap();
        assert_eq!(category.size, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_duplicate_name_ignores_case() {
        let service = service();
        let user = UserId::new();
        service.create(user, new_category("Rent", dec!(900))).await.unwrap();

        let err = service.create(user, new_category("rENT", dec!(1))).await.unwrap_err();
        assert!(matches!(err, CategoryError::DuplicateName(_)));

        // Another user may reuse the name.
        service
            .create(UserId::new(), new_category("rent", dec!(1)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_keeps_own_name_and_rejects_taken_name() {
        let service = service();
        let user = UserId::new();
        let rent = service.create(user, new_category("Rent", dec!(900))).await.unwrap();
        service.create(user, new_category("Food", dec!(300))).await.unwrap();

        let updated = service
            .update(
                user,
                rent.id,
                CategoryUpdate {
                    name: Some("RENT".into()),
                    size: Some(dec!(950)),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "RENT");
        assert_eq!(updated.size, dec!(950));

        let err = service
            .update(
                user,
                rent.id,
                CategoryUpdate {
                    name: Some("food".into()),
                    size: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_other_users_category_is_not_found() {
        let service = service();
        let owner = UserId::new();
        let category = service.create(owner, new_category("Rent", dec!(900))).await.unwrap();

        let intruder = UserId::new();
        let err = service
            .update(intruder, category.id, CategoryUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryError::NotFound(_)));

        let err = service.delete(intruder, category.id).await.unwrap_err();
        assert!(matches!(err, CategoryError::NotFound(_)));

        service.delete(owner, category.id).await.unwrap();
        assert!(service.list(owner).await.unwrap().is_empty());
    }
}
