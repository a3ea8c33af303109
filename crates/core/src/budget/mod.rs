//! Budget categories: the monthly amounts a user sets aside per spending area.

pub mod error;
pub mod service;
pub mod types;

pub use error::CategoryError;
pub use service::CategoryService;
pub use types::{Category, CategoryUpdate, NewCategory};
