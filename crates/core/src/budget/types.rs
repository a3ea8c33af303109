//! Budget category types.

use chrono::{DateTime, Utc};
use nestegg_shared::{CategoryId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A budget category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owner.
    pub user_id: UserId,
    /// Display name, unique per user ignoring case.
    pub name: String,
    /// Budgeted amount.
    pub size: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Category name.
    pub name: String,
    /// Budgeted amount.
    pub size: Decimal,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New name.
    pub name: Option<String>,
    /// New budgeted amount.
    pub size: Option<Decimal>,
}
