//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nestegg_core::advisor::ChatError;
use nestegg_core::allocation::AllocationError;
use nestegg_core::budget::CategoryError;
use nestegg_core::forecast::ForecastError;
use nestegg_core::goal::GoalError;
use nestegg_core::investment::InvestmentError;
use nestegg_core::ledger::LedgerError;
use nestegg_core::progress::ProgressError;
use nestegg_shared::AppError;
use serde_json::json;
use tracing::error;

/// Handler error rendered as `{"error": ..., "code": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 400.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Shorthand for a 401.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.public_message(),
                "code": self.0.error_code(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

macro_rules! from_domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    Self(err.into())
                }
            }
        )+
    };
}

from_domain_error!(
    AllocationError,
    CategoryError,
    ChatError,
    ForecastError,
    GoalError,
    InvestmentError,
    LedgerError,
    ProgressError,
);

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
