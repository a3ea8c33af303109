//! Savings goals.
//!
//! Every goal carries exactly one investment record. Creating a goal asks the
//! split advisor for an equity/debt split and stores it alongside the goal.

pub mod error;
pub mod service;
pub mod types;

pub use error::GoalError;
pub use service::GoalService;
pub use types::{CreatedGoal, Goal, GoalUpdate, NewGoal};
