//! Cash-flow ledger.
//!
//! This module implements:
//! - Transaction records keyed by `(user, timestamp)`
//! - Inflow/outflow aggregation and surplus computation
//! - Transaction filtering by direction and date range
//! - Ledger service for validated CRUD

pub mod aggregator;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod aggregator_props;

pub use aggregator::{compute_surplus, summarize, surplus_report};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{
    FlowDirection, LedgerSummary, NewTransaction, SurplusReport, Transaction, TransactionFilter,
    TransactionUpdate,
};
