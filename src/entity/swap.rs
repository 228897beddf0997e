use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::evm::client::ContractCall;
use crate::evm::contracts::IUniswapV2Router02;

/// Parameters of a single `swapExactTokensForETH` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub token_in: Address,
    /// Wrapped native asset, the last hop of the path
    pub token_out: Address,
    pub amount_in: U256,
    /// Zero means no slippage protection at all
    pub amount_out_min: U256,
    pub recipient: Address,
    /// Absolute unix timestamp after which the router rejects the call
    pub deadline: U256,
}

impl SwapRequest {
    pub fn path(&self) -> Vec<Address> {
        vec![self.token_in, self.token_out]
    }

    /// Encode the request as a call against `router`
    pub fn to_call(&self, router: Address) -> ContractCall {
        ContractCall::new(
            router,
            IUniswapV2Router02::swapExactTokensForETHCall {
                amountIn: self.amount_in,
                amountOutMin: self.amount_out_min,
                path: self.path(),
                to: self.recipient,
                deadline: self.deadline,
            },
        )
    }
}
