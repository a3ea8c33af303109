//! Pure aggregation over transactions and categories.

use rust_decimal::Decimal;

use super::types::{LedgerSummary, SurplusReport, Transaction};
use crate::budget::Category;

/// Totals inflows and outflows.
#[must_use]
pub fn summarize(transactions: &[Transaction]) -> LedgerSummary {
    let (total_inflow, outflow) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(inflow, outflow), tx| {
            if tx.amount > Decimal::ZERO {
                (inflow + tx.amount, outflow)
            } else {
                (inflow, outflow + tx.amount)
            }
        },
    );
    let total_outflow = outflow.abs();

    LedgerSummary {
        total_inflow,
        total_outflow,
        net: total_inflow - total_outflow,
        transaction_count: transactions.len(),
    }
}

/// Money left after outflows and every category's budget. Never negative.
#[must_use]
pub fn compute_surplus(summary: &LedgerSummary, categories: &[Category]) -> Decimal {
    (summary.net - budgeted_total(categories)).max(Decimal::ZERO)
}

/// Builds the full surplus report.
#[must_use]
pub fn surplus_report(transactions: &[Transaction], categories: &[Category]) -> SurplusReport {
    let summary = summarize(transactions);
    SurplusReport {
        summary,
        budgeted_total: budgeted_total(categories),
        surplus: compute_surplus(&summary, categories),
    }
}

fn budgeted_total(categories: &[Category]) -> Decimal {
    categories.iter().map(|c| c.size).sum()
}
