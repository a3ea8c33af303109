//! Ledger error types.

use chrono::{DateTime, Utc};
use nestegg_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Category label is blank.
    #[error("Category is required")]
    EmptyCategory,

    /// Amount is zero.
    #[error("Amount must be a non-zero number")]
    ZeroAmount,

    /// Caller tried to move a transaction in time.
    #[error("Cannot update timestamp. Please delete and recreate the transaction.")]
    TimestampImmutable,

    /// `from` lies after `to`.
    #[error("The start of the date range must not be after its end")]
    InvalidRange,

    /// A transaction already exists at this instant.
    #[error("A transaction already exists at {0}")]
    DuplicateTimestamp(DateTime<Utc>),

    /// No transaction at this timestamp for the user.
    #[error("Transaction not found: {0}")]
    NotFound(DateTime<Utc>),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::EmptyCategory
            | LedgerError::ZeroAmount
            | LedgerError::TimestampImmutable
            | LedgerError::InvalidRange => Self::Validation(err.to_string()),
            LedgerError::DuplicateTimestamp(_) => Self::Conflict(err.to_string()),
            LedgerError::NotFound(_) => Self::NotFound(
                "Transaction not found or you don't have permission to access it".to_string(),
            ),
            LedgerError::Store(e) => e.into(),
        }
    }
}
