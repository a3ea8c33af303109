//! Transaction routes plus the ledger summary and surplus views.
//!
//! Transactions are addressed by their timestamp; pass it as RFC 3339 with a
//! `Z` suffix (or URL-encode the `+` of an offset).

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use nestegg_core::ledger::{
    FlowDirection, LedgerService, NewTransaction, TransactionFilter, TransactionUpdate,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::{ValidJson, ValidQuery, data};
use crate::middleware::AuthUser;

/// Creates the ledger routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions)
                .post(create_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
        .route("/transactions/summary", get(summary))
        .route("/surplus", get(surplus))
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// `inflow` or `outflow`.
    pub filter: Option<FlowDirection>,
    /// Earliest timestamp, inclusive.
    pub from: Option<DateTime<Utc>>,
    /// Latest timestamp, inclusive.
    pub to: Option<DateTime<Utc>>,
}

impl From<ListTransactionsQuery> for TransactionFilter {
    fn from(query: ListTransactionsQuery) -> Self {
        Self {
            direction: query.filter,
            from: query.from,
            to: query.to,
        }
    }
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Category label.
    pub category: String,
    /// Signed amount: positive in, negative out.
    pub amount: Decimal,
    /// When it happened; defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New category label.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// Must equal the addressed timestamp if present.
    pub timestamp: Option<DateTime<Utc>>,
}

/// `?timestamp=` selector.
#[derive(Debug, Deserialize)]
pub struct TimestampQuery {
    /// Transaction timestamp.
    pub timestamp: DateTime<Utc>,
}

fn service(state: &AppState) -> LedgerService {
    LedgerService::new(state.transactions.clone(), state.categories.clone())
}

/// GET /transactions?filter=&from=&to=
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = TransactionFilter::from(query);
    let transactions = service(&state).list(auth.user_id(), &filter).await?;
    debug!(user_id = %auth.user_id(), count = transactions.len(), "Listed transactions");
    Ok(data(transactions))
}

/// POST /transactions
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(payload): ValidJson<CreateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let transaction = service(&state)
        .create(
            auth.user_id(),
            NewTransaction {
                category: payload.category,
                amount: payload.amount,
            },
            payload.timestamp,
        )
        .await?;
    Ok((StatusCode::CREATED, data(transaction)))
}

/// PUT /transactions?timestamp=
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<TimestampQuery>,
    ValidJson(payload): ValidJson<UpdateTransactionRequest>,
) -> ApiResult<impl IntoResponse> {
    let transaction = service(&state)
        .update(
            auth.user_id(),
            query.timestamp,
            TransactionUpdate {
                category: payload.category,
                amount: payload.amount,
            },
            payload.timestamp,
        )
        .await?;
    Ok(data(transaction))
}

/// DELETE /transactions?timestamp=
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<TimestampQuery>,
) -> ApiResult<impl IntoResponse> {
    service(&state).delete(auth.user_id(), query.timestamp).await?;
    Ok(data(json!({ "timestamp": query.timestamp })))
}

/// GET /transactions/summary
async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<ListTransactionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let summary = service(&state)
        .summary(auth.user_id(), &TransactionFilter::from(query))
        .await?;
    Ok(data(summary))
}

/// GET /surplus
async fn surplus(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let report = service(&state).surplus(auth.user_id()).await?;
    Ok(data(report))
}
