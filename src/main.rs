//! Token seller - Main executable
//!
//! Converts an ERC-20 holding into the chain's native asset through a
//! Uniswap V2 style router. Approves the router first when the current
//! allowance does not cover the amount.
use anyhow::Context;
use dotenv::dotenv;
use erc20_swap_bot::evm::wallet::shorten_address;
use erc20_swap_bot::{AppConfig, ServiceContainer};
use log::info;

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting ERC-20 swap bot v{}", erc20_swap_bot::VERSION);

    // Load and validate environment variables before touching the chain
    let config = AppConfig::from_env().context("Invalid configuration")?;

    let services = ServiceContainer::new(config).context("Failed to initialize services")?;
    info!("Signing as {}", shorten_address(&services.account()));

    let report = services
        .swap_interactor()
        .execute_swap()
        .await
        .context("Swap failed")?;

    // Machine-readable summary on stdout, logs stay on stderr
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize swap report")?
    );

    Ok(())
}
