//! LEAN BOT API server.

use std::sync::Arc;

use analytics::SentimentAnalytics;
use database::Database;
use gemini_brain::GeminiBrainConfig;
use leanbot_api::providers::{build_registry, build_scorer};
use leanbot_api::{AppState, Config};
use mistral_brain::MistralBrainConfig;
use orchestrator::Orchestrator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting LEAN BOT API");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Providers and sentiment
    let gemini = GeminiBrainConfig::from_env()?;
    let mistral = MistralBrainConfig::from_env()?;
    let scorer = build_scorer(&config, &gemini)?;
    let registry = build_registry(&config, gemini, mistral)?;

    // Build application state
    let orchestrator = Orchestrator::new(
        db,
        registry,
        scorer,
        Arc::new(SentimentAnalytics::new()),
    );
    let app = leanbot_api::app(AppState::new(orchestrator));

    // Start server
    info!(addr = %config.addr, "LEAN BOT API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
