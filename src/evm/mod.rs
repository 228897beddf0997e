pub mod client;
pub mod constants;
pub mod contracts;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{call_view, ChainClient, ChainClientError, ContractCall, RpcChainClient};
pub use contracts::{IUniswapV2Router02, IERC20};
pub use utils::{format_base_units, to_base_units, NormalizedAmount};
pub use wallet::{parse_address, signer_from_private_key};
