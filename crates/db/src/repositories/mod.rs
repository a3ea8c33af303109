//! Repository implementations of the core store traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped by the caller's `user_id`.

pub mod category;
pub mod goal;
pub mod health;
pub mod investment;
pub mod progress;
pub mod transaction;

pub use category::CategoryRepository;
pub use goal::GoalRepository;
pub use health::DatabaseHealth;
pub use investment::InvestmentRepository;
pub use progress::ProgressRepository;
pub use transaction::TransactionRepository;

use chrono::{DateTime, Utc};
use nestegg_core::store::StoreError;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DbErr, SqlErr};

/// Maps a `SeaORM` error onto the store taxonomy.
///
/// Unique violations become [`StoreError::Conflict`] so services can answer
/// with a 409 instead of a 500.
pub(crate) fn store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => StoreError::Backend(err.to_string()),
    }
}

pub(crate) fn utc(ts: DateTimeWithTimeZone) -> DateTime<Utc> {
    ts.with_timezone(&Utc)
}
