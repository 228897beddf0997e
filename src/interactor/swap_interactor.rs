use crate::config::SwapContext;
use crate::entity::{
    ApprovalReceipt, ChainMismatch, GasParams, GasSource, ResolvedGas, SwapError, SwapReport,
    SwapRequest, Token,
};
use crate::evm::client::{call_view, ChainClient, ChainClientError, ContractCall};
use crate::evm::constants::{APPROVE_GAS_FALLBACK, SWAP_GAS_FALLBACK};
use crate::evm::contracts::IERC20;
use crate::evm::utils::{format_base_units, to_base_units};
use crate::evm::wallet::shorten_address;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// Progress of a single run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SwapStage {
    Init,
    ChainVerified,
    TokenInfoLoaded,
    BalanceChecked,
    AllowanceReconciled,
    GasResolved,
    Submitted,
    Done,
}

impl std::fmt::Display for SwapStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapStage::Init => write!(f, "INIT"),
            SwapStage::ChainVerified => write!(f, "CHAIN_VERIFIED"),
            SwapStage::TokenInfoLoaded => write!(f, "TOKEN_INFO_LOADED"),
            SwapStage::BalanceChecked => write!(f, "BALANCE_CHECKED"),
            SwapStage::AllowanceReconciled => write!(f, "ALLOWANCE_RECONCILED"),
            SwapStage::GasResolved => write!(f, "GAS_RESOLVED"),
            SwapStage::Submitted => write!(f, "SUBMITTED"),
            SwapStage::Done => write!(f, "DONE"),
        }
    }
}

#[async_trait]
pub trait SwapInteractor: Send + Sync {
    /// Sell the configured amount of token for the native asset.
    ///
    /// Single shot: any fatal error aborts the run and nothing is retried.
    async fn execute_swap(&self) -> Result<SwapReport, SwapError>;
}

/// Pick the gas limit for a transaction from its estimate.
///
/// A failed estimate or a zero estimate both fall back to `fallback`, so the
/// result is never zero.
pub fn gas_limit_or_fallback(
    estimate: Result<u64, ChainClientError>,
    fallback: u64,
    method: &str,
) -> (u64, GasSource) {
    match estimate {
        Ok(0) => {
            warn!("estimateGas {} returned 0, using {}", method, fallback);
            (fallback, GasSource::FallbackAfterZero)
        }
        Ok(gas) => (gas, GasSource::Estimated),
        Err(e) => {
            warn!("estimateGas {} failed, using fallback {}: {}", method, fallback, e);
            (fallback, GasSource::FallbackAfterError)
        }
    }
}

pub struct SwapInteractorImpl<C: ChainClient> {
    client: Arc<C>,
    context: SwapContext,
    owner: Address,
}

impl<C: ChainClient> SwapInteractorImpl<C> {
    /// `owner` is the signing account's address
    pub fn new(client: Arc<C>, context: SwapContext, owner: Address) -> Self {
        Self {
            client,
            context,
            owner,
        }
    }

    pub fn recipient(&self) -> Address {
        self.context.recipient.unwrap_or(self.owner)
    }

    /// Advisory only, a mismatch is reported but never stops the run
    pub async fn verify_chain(&self) -> Result<Option<ChainMismatch>, SwapError> {
        let actual = self
            .client
            .chain_id()
            .await
            .map_err(|e| SwapError::Rpc(e.to_string()))?;

        if actual == self.context.expected_chain_id {
            info!("Connected to chainId={}", actual);
            return Ok(None);
        }

        let mismatch = ChainMismatch {
            expected: self.context.expected_chain_id,
            actual,
        };
        warn!("{}", mismatch);
        Ok(Some(mismatch))
    }

    pub async fn load_token(&self) -> Result<Token, SwapError> {
        let address = self.context.token;

        let decimals = call_view(self.client.as_ref(), address, IERC20::decimalsCall {})
            .await
            .map_err(|e| SwapError::TokenInfo(format!("decimals() on {}: {}", address, e)))?;

        // Symbol is cosmetic
        let symbol = match call_view(self.client.as_ref(), address, IERC20::symbolCall {}).await {
            Ok(symbol) => symbol,
            Err(e) => {
                debug!("symbol() unavailable on {}: {}", address, e);
                String::new()
            }
        };

        let token = Token {
            address,
            symbol,
            decimals,
        };
        info!("Token {} at {} has {} decimals", token.label(), address, decimals);

        Ok(token)
    }

    /// Fails with `InsufficientBalance` when the holding does not cover `amount`
    pub async fn check_balance(&self, token: &Token, amount: U256) -> Result<U256, SwapError> {
        let balance = call_view(
            self.client.as_ref(),
            token.address,
            IERC20::balanceOfCall {
                account: self.owner,
            },
        )
        .await
        .map_err(|e| SwapError::Rpc(e.to_string()))?;

        if balance < amount {
            return Err(SwapError::InsufficientBalance {
                symbol: token.label().to_string(),
                balance: balance.to_string(),
                required: amount.to_string(),
            });
        }

        debug!(
            "Balance {} {} covers {}",
            format_base_units(balance, token.decimals),
            token.label(),
            format_base_units(amount, token.decimals)
        );
        Ok(balance)
    }

    /// Approve the router for exactly `amount` unless the current allowance covers it
    pub async fn ensure_allowance(
        &self,
        token: &Token,
        amount: U256,
    ) -> Result<Option<ApprovalReceipt>, SwapError> {
        let spender = self.context.router;

        let current = call_view(
            self.client.as_ref(),
            token.address,
            IERC20::allowanceCall {
                owner: self.owner,
                spender,
            },
        )
        .await
        .map_err(|e| SwapError::Rpc(e.to_string()))?;

        if current >= amount {
            info!("Allowance sufficient ({}), skip approve", current);
            return Ok(None);
        }

        info!(
            "Approving {} {} for router {}",
            format_base_units(amount, token.decimals),
            token.label(),
            shorten_address(&spender)
        );

        let call = ContractCall::new(
            token.address,
            IERC20::approveCall {
                spender,
                value: amount,
            },
        );
        let gas = self.resolve_gas(&call, APPROVE_GAS_FALLBACK).await?;
        let tx_hash = self.submit(&call, gas.params).await?;

        info!("Approve tx: {}", tx_hash);
        Ok(Some(ApprovalReceipt { tx_hash, gas }))
    }

    /// Swap parameters with a deadline counted from now
    pub fn build_swap_request(&self, amount: U256) -> SwapRequest {
        let now = Utc::now().timestamp().max(0) as u64;
        let deadline = now.saturating_add(self.context.deadline_window.as_secs());

        SwapRequest {
            token_in: self.context.token,
            token_out: self.context.wrapped_native,
            amount_in: amount,
            amount_out_min: self.context.amount_out_min,
            recipient: self.recipient(),
            deadline: U256::from(deadline),
        }
    }

    /// Gas limit from estimation (or fallback) plus a fresh gas price
    async fn resolve_gas(
        &self,
        call: &ContractCall,
        fallback: u64,
    ) -> Result<ResolvedGas, SwapError> {
        let estimate = self.client.estimate_gas(call, self.owner).await;
        let (gas_limit, source) = gas_limit_or_fallback(estimate, fallback, call.method);

        let gas_price = self
            .client
            .gas_price()
            .await
            .map_err(|e| SwapError::Rpc(e.to_string()))?;

        Ok(ResolvedGas {
            params: GasParams {
                gas_limit,
                gas_price,
            },
            source,
        })
    }

    async fn submit(&self, call: &ContractCall, gas: GasParams) -> Result<TxHash, SwapError> {
        self.client
            .send_transaction(call, self.owner, gas)
            .await
            .map_err(|source| SwapError::Submission {
                method: call.method.to_string(),
                source,
            })
    }

    async fn run(&self, stage: &mut SwapStage) -> Result<SwapReport, SwapError> {
        let chain_mismatch = self.verify_chain().await?;
        advance(stage, SwapStage::ChainVerified);

        let token = self.load_token().await?;
        let amount = to_base_units(&self.context.amount_in, token.decimals)?;
        if amount.was_rescaled() {
            info!(
                "decimals {}, amountIn raw(18): {}, scaled: {}",
                token.decimals, amount.reference_units, amount.base_units
            );
        }
        advance(stage, SwapStage::TokenInfoLoaded);

        self.check_balance(&token, amount.base_units).await?;
        advance(stage, SwapStage::BalanceChecked);

        let approval = self.ensure_allowance(&token, amount.base_units).await?;
        advance(stage, SwapStage::AllowanceReconciled);

        let request = self.build_swap_request(amount.base_units);
        if request.amount_out_min.is_zero() {
            warn!("amountOutMin is 0: this swap has NO slippage protection (set AMOUNT_OUT_MIN)");
        }
        let call = request.to_call(self.context.router);
        let swap_gas = self.resolve_gas(&call, SWAP_GAS_FALLBACK).await?;
        advance(stage, SwapStage::GasResolved);

        info!(
            "Sending swap... gas={}, gasPrice={}",
            swap_gas.params.gas_limit, swap_gas.params.gas_price
        );
        let swap_tx_hash = self.submit(&call, swap_gas.params).await?;
        advance(stage, SwapStage::Submitted);

        info!("Swap tx: {}", swap_tx_hash);
        advance(stage, SwapStage::Done);
        info!("Done");

        Ok(SwapReport {
            token,
            amount_in: amount.base_units,
            chain_mismatch,
            approval,
            swap_tx_hash,
            swap_gas,
        })
    }
}

fn advance(stage: &mut SwapStage, next: SwapStage) {
    debug!("{} -> {}", stage, next);
    *stage = next;
}

#[async_trait]
impl<C> SwapInteractor for SwapInteractorImpl<C>
where
    C: ChainClient + 'static,
{
    async fn execute_swap(&self) -> Result<SwapReport, SwapError> {
        let mut stage = SwapStage::Init;

        let result = self.run(&mut stage).await;
        if let Err(e) = &result {
            error!("Swap failed after stage {}: {}", stage, e);
        }

        result
    }
}
