//! Growth forecasts for goals.

pub mod engine;
pub mod error;
pub mod service;
pub mod types;

pub use engine::{ANNUAL_DEBT_RETURN, ANNUAL_EQUITY_RETURN, project};
pub use error::ForecastError;
pub use service::GrowthForecaster;
pub use types::{ForecastInput, ForecastPoint, GoalForecast, MAX_FORECAST_MONTHS};
