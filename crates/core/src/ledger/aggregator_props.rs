//! Property-based tests for ledger aggregation.
//!
//! - Surplus is never negative
//! - `net == inflow - outflow` and both totals are non-negative
//! - Filters partition transactions by direction

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::aggregator::fixtures::{category, tx};
use super::aggregator::{compute_surplus, summarize};
use super::types::{FlowDirection, TransactionFilter};

/// Non-zero signed amounts from -10,000.00 to 10,000.00.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![-1_000_000i64..0i64, 1i64..1_000_000i64].prop_map(|cents| Decimal::new(cents, 2))
}

fn category_size() -> impl Strategy<Value = Decimal> {
    (0i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn prop_surplus_never_negative(
        amounts in prop::collection::vec(signed_amount(), 0..40),
        sizes in prop::collection::vec(category_size(), 0..10),
    ) {
        let transactions: Vec<_> = amounts.into_iter().map(tx).collect();
        let categories: Vec<_> = sizes.into_iter().map(category).collect();

        let surplus = compute_surplus(&summarize(&transactions), &categories);
        prop_assert!(surplus >= Decimal::ZERO);
    }

    #[test]
    fn prop_summary_identities(amounts in prop::collection::vec(signed_amount(), 0..40)) {
        let transactions: Vec<_> = amounts.iter().copied().map(tx).collect();
        let summary = summarize(&transactions);

        prop_assert!(summary.total_inflow >= Decimal::ZERO);
        prop_assert!(summary.total_outflow >= Decimal::ZERO);
        prop_assert_eq!(summary.net, summary.total_inflow - summary.total_outflow);
        prop_assert_eq!(summary.net, amounts.iter().copied().sum::<Decimal>());
        prop_assert_eq!(summary.transaction_count, transactions.len());
    }

    #[test]
    fn prop_direction_filters_partition(amounts in prop::collection::vec(signed_amount(), 0..40)) {
        let transactions: Vec<_> = amounts.into_iter().map(tx).collect();
        let inflow = TransactionFilter { direction: Some(FlowDirection::Inflow), ..TransactionFilter::default() };
        let outflow = TransactionFilter { direction: Some(FlowDirection::Outflow), ..TransactionFilter::default() };

        for t in &transactions {
            prop_assert!(inflow.matches(t) != outflow.matches(t));
        }
    }
}
