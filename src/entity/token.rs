use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: Address, // ERC-20 contract address
    pub symbol: String,   // Token symbol, empty when the contract does not expose one
    pub decimals: u8,     // Declared decimal precision
}

impl Token {
    /// Symbol for display, falling back to a generic label
    pub fn label(&self) -> &str {
        if self.symbol.is_empty() {
            "TOKEN"
        } else {
            &self.symbol
        }
    }
}
