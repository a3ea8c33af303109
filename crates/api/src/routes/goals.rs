//! Goal routes: CRUD, surplus allocation and growth forecasts.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use nestegg_core::allocation::{Allocation, SurplusAllocator};
use nestegg_core::forecast::GrowthForecaster;
use nestegg_core::goal::{GoalService, GoalUpdate, NewGoal};
use nestegg_shared::GoalId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, ValidQuery, data};
use crate::middleware::AuthUser;

/// Horizon used when `months` is omitted.
const DEFAULT_FORECAST_MONTHS: u32 = 12;

/// Creates the goal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/goals",
            get(list_goals)
                .post(create_goal)
                .put(update_goal)
                .delete(delete_goal),
        )
        .route("/goals/allocate", post(allocate))
        .route("/goals/{goal_id}", get(get_goal))
        .route("/goals/{goal_id}/forecast", get(forecast_goal))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a goal.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// Goal name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Amount to reach.
    pub target_amount: Decimal,
    /// Free-form questionnaire answers forwarded to the split advisor.
    pub user_questionnaire_answers: Option<Value>,
}

/// Request body for updating a goal.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    /// Goal to update.
    pub id: GoalId,
    /// New name.
    pub name: Option<String>,
    /// New description; an explicit `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    /// New target.
    pub target_amount: Option<Decimal>,
    /// Manually corrected saved amount.
    pub current_amount: Option<Decimal>,
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// `?id=` selector.
#[derive(Debug, Deserialize)]
pub struct GoalIdQuery {
    /// Goal ID.
    pub id: GoalId,
}

/// Either one allocation or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AllocateRequest {
    /// `{"allocations": [...]}`
    Batch {
        /// Allocations applied in order.
        allocations: Vec<Allocation>,
    },
    /// `{"goal_id": ..., "amount": ...}`
    Single(Allocation),
}

/// Forecast query parameters.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Horizon in months.
    pub months: Option<u32>,
    /// Added at the end of every month.
    pub monthly_contribution: Option<Decimal>,
}

// ============================================================================
// Handlers
// ============================================================================

fn service(state: &AppState) -> GoalService {
    GoalService::new(
        state.goals.clone(),
        state.investments.clone(),
        state.reasoning.clone(),
    )
}

/// GET /goals
async fn list_goals(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let goals = service(&state).list(auth.user_id()).await?;
    Ok(data(goals))
}

/// GET /goals/{goal_id}
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<GoalId>,
) -> ApiResult<impl IntoResponse> {
    let goal = service(&state).get(auth.user_id(), goal_id).await?;
    Ok(data(goal))
}

/// POST /goals
///
/// Creates the goal and attaches an investment with the advised split.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CreateGoalRequest>,
) -> ApiResult<impl IntoResponse> {
    let created = service(&state)
        .create(
            auth.user_id(),
            NewGoal {
                name: payload.name,
                description: payload.description,
                target_amount: payload.target_amount,
            },
            payload.user_questionnaire_answers.as_ref(),
        )
        .await?;

    info!(user_id = %auth.user_id(), goal_id = %created.goal.id, "Goal created via API");
    Ok((StatusCode::CREATED, data(created)))
}

/// PUT /goals
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<UpdateGoalRequest>,
) -> ApiResult<impl IntoResponse> {
    let goal = service(&state)
        .update(
            auth.user_id(),
            payload.id,
            GoalUpdate {
                name: payload.name,
                description: payload.description,
                target_amount: payload.target_amount,
                current_amount: payload.current_amount,
            },
        )
        .await?;
    Ok(data(goal))
}

/// DELETE /goals?id=
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<GoalIdQuery>,
) -> ApiResult<impl IntoResponse> {
    service(&state).delete(auth.user_id(), query.id).await?;
    Ok(data(json!({ "id": query.id })))
}

/// POST /goals/allocate
///
/// A single allocation answers with the updated goal, a batch with the
/// updated goals in input order.
async fn allocate(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<AllocateRequest>,
) -> ApiResult<Response> {
    let allocator = SurplusAllocator::new(state.goals.clone());
    let response = match payload {
        AllocateRequest::Single(allocation) => {
            let goal = allocator
                .allocate(auth.user_id(), allocation.goal_id, allocation.amount)
                .await?;
            data(goal).into_response()
        }
        AllocateRequest::Batch { allocations } => {
            let goals = allocator.allocate_many(auth.user_id(), &allocations).await?;
            data(goals).into_response()
        }
    };
    Ok(response)
}

/// GET /goals/{goal_id}/forecast?months=&monthly_contribution=
async fn forecast_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(goal_id): Path<GoalId>,
    ValidQuery(query): ValidQuery<ForecastQuery>,
) -> ApiResult<impl IntoResponse> {
    let forecaster = GrowthForecaster::new(state.goals.clone(), state.investments.clone());
    let forecast = forecaster
        .forecast_goal(
            auth.user_id(),
            goal_id,
            query.monthly_contribution.unwrap_or(Decimal::ZERO),
            query.months.unwrap_or(DEFAULT_FORECAST_MONTHS),
            Utc::now().date_naive(),
        )
        .await?;
    Ok(data(forecast))
}
