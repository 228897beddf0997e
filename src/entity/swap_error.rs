use crate::evm::client::ChainClientError;

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Failed to read token info: {0}")]
    TokenInfo(String),

    #[error("Insufficient {symbol} balance. Balance={balance}, required={required}")]
    InsufficientBalance {
        symbol: String,
        balance: String,
        required: String,
    },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Failed to submit {method} transaction: {source}")]
    Submission {
        method: String,
        #[source]
        source: ChainClientError,
    },
}

impl From<::config::ConfigError> for SwapError {
    fn from(err: ::config::ConfigError) -> Self {
        SwapError::Config(err.to_string())
    }
}
