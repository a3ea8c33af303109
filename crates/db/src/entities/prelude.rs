//! Entity re-exports.

pub use super::user_categories::Entity as UserCategories;
pub use super::user_goals::Entity as UserGoals;
pub use super::user_investments::Entity as UserInvestments;
pub use super::user_progress::Entity as UserProgress;
pub use super::user_transactions::Entity as UserTransactions;
