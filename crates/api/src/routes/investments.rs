//! Investment routes and the split advisor endpoint.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use nestegg_core::advisor::SplitAdvisor;
use nestegg_core::goal::GoalService;
use nestegg_core::investment::{InvestmentManager, SplitUpdate};
use nestegg_shared::{GoalId, InvestmentId};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, ValidQuery, data};
use crate::middleware::AuthUser;

/// Creates the investment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/investments",
            get(list_investments)
                .post(create_investment)
                .put(update_investment)
                .delete(delete_investment),
        )
        .route("/investments/calculate-split", post(calculate_split))
}

/// Optional `?goal_id=` filter.
#[derive(Debug, Deserialize)]
pub struct ListInvestmentsQuery {
    /// Only the investment attached to this goal.
    pub goal_id: Option<GoalId>,
}

/// Request body for creating an investment.
#[derive(Debug, Deserialize)]
pub struct CreateInvestmentRequest {
    /// Goal to attach to.
    pub goal_id: GoalId,
    /// Debt percentage.
    pub percentage_debt: Decimal,
    /// Equity percentage.
    pub percentage_equity: Decimal,
}

/// Request body for updating an investment. Either side may be omitted.
#[derive(Debug, Deserialize)]
pub struct UpdateInvestmentRequest {
    /// Investment to update.
    pub id: InvestmentId,
    /// New debt percentage.
    pub percentage_debt: Option<Decimal>,
    /// New equity percentage.
    pub percentage_equity: Option<Decimal>,
}

/// `?id=` selector.
#[derive(Debug, Deserialize)]
pub struct InvestmentIdQuery {
    /// Investment ID.
    pub id: InvestmentId,
}

/// Request body for a split proposal.
#[derive(Debug, Deserialize)]
pub struct CalculateSplitRequest {
    /// Goal to advise on.
    pub goal_id: GoalId,
    /// Free-form questionnaire answers.
    pub user_questionnaire_answers: Option<Value>,
}

fn manager(state: &AppState) -> InvestmentManager {
    InvestmentManager::new(state.goals.clone(), state.investments.clone())
}

/// GET /investments[?goal_id=]
async fn list_investments(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<ListInvestmentsQuery>,
) -> ApiResult<Response> {
    let manager = manager(&state);
    let response = match query.goal_id {
        Some(goal_id) => data(manager.get_for_goal(auth.user_id(), goal_id).await?).into_response(),
        None => data(manager.list(auth.user_id()).await?).into_response(),
    };
    Ok(response)
}

/// POST /investments
async fn create_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CreateInvestmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let investment = manager(&state)
        .create(
            auth.user_id(),
            payload.goal_id,
            payload.percentage_debt,
            payload.percentage_equity,
        )
        .await?;
    Ok((StatusCode::CREATED, data(investment)))
}

/// PUT /investments
async fn update_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<UpdateInvestmentRequest>,
) -> ApiResult<impl IntoResponse> {
    let investment = manager(&state)
        .update(
            auth.user_id(),
            payload.id,
            SplitUpdate {
                percentage_debt: payload.percentage_debt,
                percentage_equity: payload.percentage_equity,
            },
        )
        .await?;
    Ok(data(investment))
}

/// DELETE /investments?id=
async fn delete_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<InvestmentIdQuery>,
) -> ApiResult<impl IntoResponse> {
    manager(&state).delete(auth.user_id(), query.id).await?;
    Ok(data(json!({ "id": query.id })))
}

/// POST /investments/calculate-split
///
/// Never fails because of the reasoning service; a bad or missing answer
/// yields the 60/40 default. The body is the bare split object.
async fn calculate_split(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CalculateSplitRequest>,
) -> ApiResult<impl IntoResponse> {
    let goals = GoalService::new(
        state.goals.clone(),
        state.investments.clone(),
        state.reasoning.clone(),
    );
    let goal = goals.get(auth.user_id(), payload.goal_id).await?;

    let proposal = SplitAdvisor::new(state.reasoning.clone())
        .propose(&goal, payload.user_questionnaire_answers.as_ref())
        .await;

    info!(
        user_id = %auth.user_id(),
        goal_id = %goal.id,
        equity = proposal.percentage_equity,
        debt = proposal.percentage_debt,
        "Split calculated"
    );
    Ok(Json(proposal))
}
