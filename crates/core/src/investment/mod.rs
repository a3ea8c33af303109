//! Investment records: the equity/debt split attached to each goal.

pub mod error;
pub mod manager;
pub mod split;
pub mod types;

pub use error::InvestmentError;
pub use manager::InvestmentManager;
pub use split::{SPLIT_TOLERANCE, Split};
pub use types::{Investment, NewInvestment, SplitUpdate};
