use alloy::primitives::{address, Address};

// Network defaults (Optimism mainnet)
pub const OPTIMISM_CHAIN_ID: u64 = 10;
pub const WETH_OPTIMISM: Address = address!("4200000000000000000000000000000000000006");

// Amount defaults
pub const REFERENCE_DECIMALS: u8 = 18;
pub const DEFAULT_AMOUNT_IN: &str = "0.1";

// Gas limits used when the node cannot give a usable estimate
pub const APPROVE_GAS_FALLBACK: u64 = 60_000;
pub const SWAP_GAS_FALLBACK: u64 = 250_000;

// Timing
pub const DEFAULT_DEADLINE_SECS: u64 = 600;
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 20;
