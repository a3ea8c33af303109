//! Investment record types.

use chrono::{DateTime, Utc};
use nestegg_shared::{GoalId, InvestmentId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::split::Split;

/// The equity/debt split stored for one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investment {
    /// Investment ID.
    pub id: InvestmentId,
    /// Owner.
    pub user_id: UserId,
    /// Goal this split belongs to. At most one investment per goal.
    pub goal_id: GoalId,
    /// Debt percentage.
    pub percentage_debt: Decimal,
    /// Equity percentage.
    pub percentage_equity: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Investment {
    /// Returns the stored split.
    ///
    /// Rows are only ever written from a validated [`Split`], so this falls
    /// back to the default split only if the table was edited by hand.
    #[must_use]
    pub fn split(&self) -> Split {
        Split::validated(self.percentage_debt, self.percentage_equity)
            .unwrap_or_else(|_| Split::fallback())
    }
}

/// Input for inserting an investment.
#[derive(Debug, Clone, Copy)]
pub struct NewInvestment {
    /// Goal the split belongs to.
    pub goal_id: GoalId,
    /// Validated split.
    pub split: Split,
}

/// Partial update of a split. At least one side must be present.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SplitUpdate {
    /// New debt percentage.
    pub percentage_debt: Option<Decimal>,
    /// New equity percentage.
    pub percentage_equity: Option<Decimal>,
}
