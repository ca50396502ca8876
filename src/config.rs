use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub json_rpc_urls: Vec<String>,
    pub donation_contract_address: Address,
    pub notification_base_url: String,
    pub database_url: String,
    pub token_addresses: Vec<String>,
    pub token_symbols: Vec<String>,
    pub token_decimals: Vec<u32>,
    pub start_block: u64,
    pub range_size: u64,
    pub poll_interval: Duration,
    pub api_listen_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let json_rpc_urls = split_list(
            &std::env::var("JSON_RPC_URLS").context("JSON_RPC_URLS must be set in .env")?,
        );
        if json_rpc_urls.is_empty() {
            anyhow::bail!("JSON_RPC_URLS must contain at least one URL");
        }

        let contract_address_str = std::env::var("DONATION_CONTRACT_ADDRESS")
            .context("DONATION_CONTRACT_ADDRESS must be set in .env")?;
        let donation_contract_address = Address::from_str(&contract_address_str)
            .context("Invalid DONATION_CONTRACT_ADDRESS format")?;

        let notification_base_url = std::env::var("NOTIFICATION_BASE_URL")
            .context("NOTIFICATION_BASE_URL must be set in .env")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./donations.db".to_string());

        let token_addresses =
            split_list(&std::env::var("SUPPORTED_ERC20_TOKEN_ADDRESS").unwrap_or_default());
        let token_symbols =
            split_list(&std::env::var("SUPPORTED_ERC20_TOKEN_SYMBOL").unwrap_or_default());
        let token_decimals =
            split_list(&std::env::var("SUPPORTED_ERC20_TOKEN_DECIMAL").unwrap_or_default())
                .iter()
                .map(|raw| {
                    raw.parse::<u32>()
                        .with_context(|| format!("Invalid token decimal value: {raw}"))
                })
                .collect::<Result<Vec<_>>>()?;

        let start_block = env_u64("START_BLOCK", 0)?;
        let range_size = env_u64("RANGE_SIZE", 1000)?;
        let poll_interval = Duration::from_secs(env_u64("POLL_INTERVAL_SECS", 12)?);

        let api_listen_addr = std::env::var("API_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3001".to_string())
            .parse()
            .context("Invalid API_LISTEN_ADDR")?;

        Ok(Config {
            json_rpc_urls,
            donation_contract_address,
            notification_base_url,
            database_url,
            token_addresses,
            token_symbols,
            token_decimals,
            start_block,
            range_size,
            poll_interval,
            api_listen_addr,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
