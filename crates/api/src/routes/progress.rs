//! Baby-step progress routes.

use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use nestegg_core::progress::ProgressService;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, data};
use crate::middleware::AuthUser;

/// Creates the progress routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/progress",
        get(get_progress).post(create_progress).put(put_progress),
    )
}

/// Request body for setting the current step.
#[derive(Debug, Deserialize)]
pub struct StepRequest {
    /// Step number, starting at 1.
    pub current_step: i32,
}

fn service(state: &AppState) -> ProgressService {
    ProgressService::new(state.progress.clone())
}

/// GET /progress
///
/// Answers `{"data": null}` for users who have not started yet.
async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let progress = service(&state).get(auth.user_id()).await?;
    Ok(data(progress))
}

/// POST /progress
async fn create_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<StepRequest>,
) -> ApiResult<impl IntoResponse> {
    let progress = service(&state)
        .create(auth.user_id(), payload.current_step)
        .await?;
    Ok((StatusCode::CREATED, data(progress)))
}

/// PUT /progress
async fn put_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<StepRequest>,
) -> ApiResult<impl IntoResponse> {
    let progress = service(&state).put(auth.user_id(), payload.current_step).await?;
    Ok(data(progress))
}
