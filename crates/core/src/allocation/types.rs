//! Allocation types.

use nestegg_shared::GoalId;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Money to add to one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Allocation {
    /// Target goal.
    pub goal_id: GoalId,
    /// Amount to add. Must be positive.
    pub amount: Decimal,
}
