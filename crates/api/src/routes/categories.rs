//! Budget category routes.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use nestegg_core::budget::{CategoryService, CategoryUpdate, NewCategory};
use nestegg_shared::CategoryId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, ValidQuery, data};
use crate::middleware::AuthUser;

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/categories",
        get(list_categories)
            .post(create_category)
            .put(update_category)
            .delete(delete_category),
    )
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    pub name: String,
    /// Budgeted size.
    pub size: Decimal,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// Category to update.
    pub id: CategoryId,
    /// New name.
    pub name: Option<String>,
    /// New size.
    pub size: Option<Decimal>,
}

/// `?id=` selector.
#[derive(Debug, Deserialize)]
pub struct CategoryIdQuery {
    /// Category ID.
    pub id: CategoryId,
}

fn service(state: &AppState) -> CategoryService {
    CategoryService::new(state.categories.clone())
}

/// GET /categories
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let categories = service(&state).list(auth.user_id()).await?;
    Ok(data(categories))
}

/// POST /categories
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CreateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = service(&state)
        .create(
            auth.user_id(),
            NewCategory {
                name: payload.name,
                size: payload.size,
            },
        )
        .await?;

    info!(user_id = %auth.user_id(), category_id = %category.id, "Category created via API");
    Ok((StatusCode::CREATED, data(category)))
}

/// PUT /categories
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<UpdateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = service(&state)
        .update(
            auth.user_id(),
            payload.id,
            CategoryUpdate {
                name: payload.name,
                size: payload.size,
            },
        )
        .await?;
    Ok(data(category))
}

/// DELETE /categories?id=
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<CategoryIdQuery>,
) -> ApiResult<impl IntoResponse> {
    service(&state).delete(auth.user_id(), query.id).await?;
    Ok(data(json!({ "id": query.id })))
}
