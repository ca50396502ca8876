use anyhow::Result;
use donation_indexer::api::{ApiState, create_api_router};
use donation_indexer::config::Config;
use donation_indexer::repository::Database;
use donation_indexer::tokens::TokenRegistry;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    info!("Starting donation query API");

    let config = Config::from_env()?;
    let registry = TokenRegistry::from_config(
        &config.token_addresses,
        &config.token_symbols,
        &config.token_decimals,
    )?;
    info!("Token registry loaded with {} token(s)", registry.len());

    let db = Database::new(&config.database_url)?;
    info!("Database initialized");

    let state = Arc::new(ApiState::new(db, registry));
    let app = create_api_router(state);

    let listener = tokio::net::TcpListener::bind(config.api_listen_addr).await?;
    info!("Server started on {}", config.api_listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
