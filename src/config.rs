use alloy::primitives::{Address, U256};
use serde::Deserialize;
use std::time::Duration;

use crate::entity::SwapError;
use crate::evm::constants::{
    DEFAULT_AMOUNT_IN, DEFAULT_DEADLINE_SECS, DEFAULT_RPC_TIMEOUT_SECS, OPTIMISM_CHAIN_ID,
    WETH_OPTIMISM,
};
use crate::evm::wallet::parse_address;

/// Raw settings as found in the environment (and `.env`).
///
/// No `Debug`: this holds the private key.
#[derive(Clone, Default, Deserialize)]
pub struct Settings {
    pub optimism_rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub token_address: Option<String>,
    pub router_address: Option<String>,
    pub amount_in: Option<String>,
    pub recipient: Option<String>,
    pub expected_chain_id: Option<String>,
    pub wrapped_native_address: Option<String>,
    pub amount_out_min: Option<String>,
    pub deadline_secs: Option<String>,
    pub rpc_timeout_secs: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, SwapError> {
        let settings = ::config::Config::builder()
            .add_source(::config::Environment::default())
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Validated, immutable parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapContext {
    pub rpc_url: String,
    pub token: Address,
    pub router: Address,
    pub wrapped_native: Address,
    /// Whole-unit decimal string, normalized once token decimals are known
    pub amount_in: String,
    /// `None` sends the proceeds to the signer itself
    pub recipient: Option<Address>,
    pub expected_chain_id: u64,
    /// Minimum native output in wei. Zero disables slippage protection
    pub amount_out_min: U256,
    pub deadline_window: Duration,
    pub rpc_timeout: Duration,
}

/// Everything needed at startup
#[derive(Clone)]
pub struct AppConfig {
    pub context: SwapContext,
    pub private_key: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("context", &self.context)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, SwapError> {
        Self::from_settings(Settings::from_env()?)
    }

    pub fn from_settings(settings: Settings) -> Result<Self, SwapError> {
        let rpc_url = non_blank(settings.optimism_rpc_url);
        let private_key = non_blank(settings.private_key);
        let token = non_blank(settings.token_address);
        let router = non_blank(settings.router_address);

        let (rpc_url, private_key, token, router) = match (rpc_url, private_key, token, router) {
            (Some(rpc_url), Some(private_key), Some(token), Some(router)) => {
                (rpc_url, private_key, token, router)
            }
            _ => {
                return Err(SwapError::Config(
                    "Missing environment. Need OPTIMISM_RPC_URL, PRIVATE_KEY, TOKEN_ADDRESS, ROUTER_ADDRESS"
                        .to_string(),
                ))
            }
        };

        let token = parse_address(&token, "TOKEN_ADDRESS")?;
        let router = parse_address(&router, "ROUTER_ADDRESS")?;

        let wrapped_native = match non_blank(settings.wrapped_native_address) {
            Some(value) => parse_address(&value, "WRAPPED_NATIVE_ADDRESS")?,
            None => WETH_OPTIMISM,
        };

        let recipient = non_blank(settings.recipient)
            .map(|value| parse_address(&value, "RECIPIENT"))
            .transpose()?;

        let amount_out_min = match non_blank(settings.amount_out_min) {
            Some(value) => value.parse::<U256>().map_err(|e| {
                SwapError::Config(format!("AMOUNT_OUT_MIN must be an integer in wei: {}", e))
            })?,
            None => U256::ZERO,
        };

        Ok(Self {
            context: SwapContext {
                rpc_url,
                token,
                router,
                wrapped_native,
                amount_in: non_blank(settings.amount_in)
                    .unwrap_or_else(|| DEFAULT_AMOUNT_IN.to_string()),
                recipient,
                expected_chain_id: parse_u64(
                    settings.expected_chain_id,
                    "EXPECTED_CHAIN_ID",
                    OPTIMISM_CHAIN_ID,
                )?,
                amount_out_min,
                deadline_window: Duration::from_secs(parse_positive_u64(
                    settings.deadline_secs,
                    "DEADLINE_SECS",
                    DEFAULT_DEADLINE_SECS,
                )?),
                rpc_timeout: Duration::from_secs(parse_positive_u64(
                    settings.rpc_timeout_secs,
                    "RPC_TIMEOUT_SECS",
                    DEFAULT_RPC_TIMEOUT_SECS,
                )?),
            },
            private_key,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_u64(value: Option<String>, name: &str, default: u64) -> Result<u64, SwapError> {
    match non_blank(value) {
        Some(v) => v
            .parse()
            .map_err(|e| SwapError::Config(format!("{} must be an integer: {}", name, e))),
        None => Ok(default),
    }
}

fn parse_positive_u64(value: Option<String>, name: &str, default: u64) -> Result<u64, SwapError> {
    match parse_u64(value, name, default)? {
        0 => Err(SwapError::Config(format!("{} must be a positive integer", name))),
        n => Ok(n),
    }
}
