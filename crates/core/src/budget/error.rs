//! Category error types.

use nestegg_shared::{AppError, CategoryId};
use thiserror::Error;

use crate::store::StoreError;

/// Category-related errors.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// Name is blank.
    #[error("Category name is required")]
    EmptyName,

    /// Size is negative.
    #[error("Size must be a non-negative number")]
    NegativeSize,

    /// Another category already uses this name.
    #[error("A category named \"{0}\" already exists")]
    DuplicateName(String),

    /// Category absent or owned by someone else.
    #[error("Category not found: {0}")]
    NotFound(CategoryId),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::EmptyName | CategoryError::NegativeSize => {
                Self::Validation(err.to_string())
            }
            CategoryError::DuplicateName(_) => Self::Conflict(err.to_string()),
            CategoryError::NotFound(_) => Self::NotFound(
                "Category not found or you don't have permission to access it".to_string(),
            ),
            CategoryError::Store(e) => e.into(),
        }
    }
}
