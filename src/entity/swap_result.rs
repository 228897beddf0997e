use alloy::primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};

use crate::entity::{ResolvedGas, Token};

/// The connected node reports a different chain than configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMismatch {
    pub expected: u64,
    pub actual: u64,
}

impl std::fmt::Display for ChainMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "connected to chainId={} but expected chainId={}, check the RPC endpoint",
            self.actual, self.expected
        )
    }
}

/// Approval submitted during allowance reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    pub tx_hash: TxHash,
    pub gas: ResolvedGas,
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReport {
    pub token: Token,
    pub amount_in: U256,
    pub chain_mismatch: Option<ChainMismatch>,
    /// `None` when the existing allowance already covered the amount
    pub approval: Option<ApprovalReceipt>,
    pub swap_tx_hash: TxHash,
    pub swap_gas: ResolvedGas,
}
