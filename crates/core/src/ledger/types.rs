//! Ledger types.

use chrono::{DateTime, Utc};
use nestegg_shared::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cash-flow transaction. Positive amounts are inflows, negative outflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Owner.
    pub user_id: UserId,
    /// When it happened. Together with `user_id` this identifies the row.
    pub timestamp: DateTime<Utc>,
    /// Free-text category label.
    pub category: String,
    /// Signed amount, never zero.
    pub amount: Decimal,
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Category label.
    pub category: String,
    /// Signed amount.
    pub amount: Decimal,
}

/// Partial update. The timestamp is part of the identity and cannot change.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    /// New category label.
    pub category: Option<String>,
    /// New signed amount.
    pub amount: Option<Decimal>,
}

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Money in (`amount > 0`).
    Inflow,
    /// Money out (`amount < 0`).
    Outflow,
}

/// Query filter for transactions. Bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Restrict to one direction.
    pub direction: Option<FlowDirection>,
    /// Earliest timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Latest timestamp.
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Whether `tx` passes the filter.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        let direction_ok = match self.direction {
            Some(FlowDirection::Inflow) => tx.amount > Decimal::ZERO,
            Some(FlowDirection::Outflow) => tx.amount < Decimal::ZERO,
            None => true,
        };
        direction_ok
            && self.from.is_none_or(|from| tx.timestamp >= from)
            && self.to.is_none_or(|to| tx.timestamp <= to)
    }
}

/// Totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Sum of positive amounts.
    pub total_inflow: Decimal,
    /// Absolute sum of negative amounts.
    pub total_outflow: Decimal,
    /// `total_inflow - total_outflow`.
    pub net: Decimal,
    /// Number of transactions summed.
    pub transaction_count: usize,
}

/// Everything the surplus view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurplusReport {
    /// Cash-flow totals.
    #[serde(flatten)]
    pub summary: LedgerSummary,
    /// Sum of all category sizes.
    pub budgeted_total: Decimal,
    /// Unallocated money, clamped at zero.
    pub surplus: Decimal,
}
