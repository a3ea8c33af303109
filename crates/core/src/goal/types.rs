//! Goal types.

use chrono::{DateTime, Utc};
use nestegg_shared::{GoalId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::investment::Investment;

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal ID.
    pub id: GoalId,
    /// Owner.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Amount the user wants to reach. Always positive.
    pub target_amount: Decimal,
    /// Amount allocated so far. Never negative.
    pub current_amount: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a goal. The store sets `current_amount` to zero.
#[derive(Debug, Clone)]
pub struct NewGoal {
    /// Goal name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Target amount.
    pub target_amount: Decimal,
}

/// Partial update for a goal.
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    /// New name.
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    /// New target amount.
    pub target_amount: Option<Decimal>,
    /// Direct override of the allocated amount.
    pub current_amount: Option<Decimal>,
}

/// A freshly created goal together with its investment record.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedGoal {
    /// The goal.
    #[serde(flatten)]
    pub goal: Goal,
    /// The split proposed for it.
    pub investment: Investment,
}
