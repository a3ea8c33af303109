//! Core business logic for Nestegg.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; persistence
//! and the text-generation service are reached through the traits in [`store`]
//! and [`advisor::reasoning`].
//!
//! # Modules
//!
//! - `ledger` - Cash-flow transactions, totals and surplus
//! - `budget` - Budget categories
//! - `goal` - Savings goals
//! - `advisor` - Equity/debt split proposals and conversational advice
//! - `investment` - Equity/debt split records per goal
//! - `allocation` - Distributing surplus into goals
//! - `forecast` - Projected goal growth
//! - `progress` - Baby-step progress tracking

pub mod advisor;
pub mod allocation;
pub mod budget;
pub mod forecast;
pub mod goal;
pub mod investment;
pub mod ledger;
pub mod progress;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod memory;
