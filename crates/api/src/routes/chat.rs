//! Conversational coaching endpoint.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use nestegg_core::advisor::{ChatAdvisor, ChatContext, ChatMessage};
use nestegg_core::budget::CategoryService;
use nestegg_core::progress::ProgressService;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::ValidJson;
use crate::middleware::AuthUser;

/// Creates the chat routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's question.
    pub message: String,
    /// Earlier turns, oldest first.
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

/// POST /chat
///
/// Answers with a bare `{"message": ...}` object.
async fn chat(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<ChatRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = auth.user_id();
    let categories = CategoryService::new(state.categories.clone())
        .list(user_id)
        .await?;
    let progress = ProgressService::new(state.progress.clone())
        .get(user_id)
        .await?;
    let context = ChatContext::new(&categories, progress.as_ref());

    let reply = ChatAdvisor::new(state.reasoning.clone())
        .respond(&payload.message, &payload.conversation_history, &context)
        .await?;

    info!(user_id = %user_id, history = payload.conversation_history.len(), "Chat answered");
    Ok(Json(json!({ "message": reply })))
}
