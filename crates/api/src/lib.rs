//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Request extractors and the response envelope
//! - The HTTP client for the reasoning service

pub mod error;
pub mod extractors;
pub mod gemini;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use nestegg_core::advisor::ReasoningClient;
use nestegg_core::store::{
    CategoryStore, GoalStore, InvestmentStore, ProgressStore, StoreHealth, TransactionStore,
};
use nestegg_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
///
/// Stores and the reasoning client are trait objects so tests can swap in
/// in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    /// Budget categories.
    pub categories: Arc<dyn CategoryStore>,
    /// Savings goals.
    pub goals: Arc<dyn GoalStore>,
    /// Investment splits.
    pub investments: Arc<dyn InvestmentStore>,
    /// Cash-flow transactions.
    pub transactions: Arc<dyn TransactionStore>,
    /// Baby-step progress.
    pub progress: Arc<dyn ProgressStore>,
    /// Backend reachability.
    pub health: Arc<dyn StoreHealth>,
    /// Text generation service.
    pub reasoning: Arc<dyn ReasoningClient>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
