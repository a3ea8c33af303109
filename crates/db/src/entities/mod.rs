//! `SeaORM` entity definitions.

pub mod prelude;

pub mod user_categories;
pub mod user_goals;
pub mod user_investments;
pub mod user_progress;
pub mod user_transactions;
