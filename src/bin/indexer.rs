use anyhow::Result;
use donation_indexer::config::Config;
use donation_indexer::notifier::Notifier;
use donation_indexer::repository::Database;
use donation_indexer::rpc::RpcClient;
use donation_indexer::scanner::Scanner;
use donation_indexer::tokens::TokenRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    info!("Starting donation event indexer");

    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("Contract address: {:?}", config.donation_contract_address);
    info!(
        "RPC URLs: {} endpoint(s) configured",
        config.json_rpc_urls.len()
    );

    let registry = Arc::new(TokenRegistry::from_config(
        &config.token_addresses,
        &config.token_symbols,
        &config.token_decimals,
    )?);
    info!("Token registry loaded with {} token(s)", registry.len());

    let db = Database::new(&config.database_url)?;
    info!("Database initialized");

    let client = RpcClient::new(&config.json_rpc_urls)?;
    let chain_head = client.get_latest_block().await?;
    info!("RPC client connected, chain head at block {}", chain_head);

    let notifier = Notifier::new(config.notification_base_url.clone(), registry)?;
    let (alert_tx, alert_rx) = Notifier::channel();
    let notifier_handle = tokio::spawn(notifier.run(alert_rx));

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
                cancel.cancel();
            }
        });
    }

    let scanner = Scanner::new(client, db, alert_tx, &config);
    if let Err(e) = scanner.run(cancel).await {
        error!("Indexer error: {}", e);
        return Err(e);
    }

    // Closing the alert channel lets the notifier drain and exit.
    drop(scanner);
    notifier_handle.await?;

    Ok(())
}
