//! Nestegg API Server
//!
//! Main entry point for the Nestegg backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nestegg_api::gemini::GeminiClient;
use nestegg_api::{AppState, create_router};
use nestegg_db::{
    CategoryRepository, DatabaseHealth, GoalRepository, InvestmentRepository, ProgressRepository,
    TransactionRepository, connect,
};
use nestegg_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nestegg=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        audience: config.jwt.audience.clone(),
        ..JwtConfig::default()
    });

    if config.reasoning.api_key.is_empty() {
        warn!("NESTEGG__REASONING__API_KEY is not set; split advice will use the default and chat will fail");
    }
    let reasoning = GeminiClient::new(&config.reasoning)
        .context("Failed to build reasoning client")?;
    info!(
        model = %config.reasoning.model,
        timeout_secs = config.reasoning.timeout_secs,
        "Reasoning service configured"
    );

    let state = AppState {
        categories: Arc::new(CategoryRepository::new(db.clone())),
        goals: Arc::new(GoalRepository::new(db.clone())),
        investments: Arc::new(InvestmentRepository::new(db.clone())),
        transactions: Arc::new(TransactionRepository::new(db.clone())),
        progress: Arc::new(ProgressRepository::new(db.clone())),
        health: Arc::new(DatabaseHealth::new(db)),
        reasoning: Arc::new(reasoning),
        jwt_service: Arc::new(jwt_service),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
