use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use erc20_swap_bot::evm::client::{ChainClient, ChainClientError, ContractCall};
use erc20_swap_bot::evm::contracts::{IUniswapV2Router02, IERC20};
use erc20_swap_bot::{
    GasParams, GasSource, SwapContext, SwapError, SwapInteractor, SwapInteractorImpl,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const TOKEN: Address = address!("68f180fcCe6836688e9084f035309E29Bf0A2095");
const ROUTER: Address = address!("9c12939390052919aF3155f41Bf4160Fd3666A6f");
const WETH: Address = address!("4200000000000000000000000000000000000006");

const GAS_PRICE: u128 = 1_000_000;

#[derive(Debug, Clone)]
struct Sent {
    method: &'static str,
    calldata: Bytes,
    gas: GasParams,
}

/// In-memory node for one ERC-20 and one router
struct MockChain {
    chain_id: u64,
    decimals: Option<u8>,
    symbol: Option<String>,
    balance: U256,
    allowance: Mutex<U256>,
    approve_estimate: Result<u64, String>,
    swap_estimate: Result<u64, String>,
    reject_submissions: bool,
    sent: Mutex<Vec<Sent>>,
}

impl MockChain {
    fn new(balance: u64, allowance: u64) -> Self {
        Self {
            chain_id: 10,
            decimals: Some(6),
            symbol: Some("USDC".to_string()),
            balance: U256::from(balance),
            allowance: Mutex::new(U256::from(allowance)),
            approve_estimate: Ok(46_000),
            swap_estimate: Ok(180_000),
            reject_submissions: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn chain_id(&self) -> Result<u64, ChainClientError> {
        Ok(self.chain_id)
    }

    async fn gas_price(&self) -> Result<u128, ChainClientError> {
        Ok(GAS_PRICE)
    }

    async fn read_contract(&self, call: &ContractCall) -> Result<Bytes, ChainClientError> {
        assert_eq!(call.to, TOKEN, "only the token is read");

        let output = match call.selector() {
            Some(IERC20::decimalsCall::SELECTOR) => match self.decimals {
                Some(decimals) => U256::from(decimals).abi_encode(),
                None => return Err(ChainClientError::Transport("execution reverted".into())),
            },
            Some(IERC20::symbolCall::SELECTOR) => match &self.symbol {
                Some(symbol) => symbol.abi_encode(),
                None => return Err(ChainClientError::Transport("execution reverted".into())),
            },
            Some(IERC20::balanceOfCall::SELECTOR) => {
                let args = IERC20::balanceOfCall::abi_decode(&call.calldata).unwrap();
                assert_eq!(args.account, OWNER);
                self.balance.abi_encode()
            }
            Some(IERC20::allowanceCall::SELECTOR) => {
                let args = IERC20::allowanceCall::abi_decode(&call.calldata).unwrap();
                assert_eq!((args.owner, args.spender), (OWNER, ROUTER));
                self.allowance.lock().unwrap().abi_encode()
            }
            other => panic!("unexpected read {:?}", other),
        };

        Ok(output.into())
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<u64, ChainClientError> {
        assert_eq!(from, OWNER);

        let estimate = match call.selector() {
            Some(IERC20::approveCall::SELECTOR) => &self.approve_estimate,
            Some(IUniswapV2Router02::swapExactTokensForETHCall::SELECTOR) => &self.swap_estimate,
            other => panic!("unexpected estimate {:?}", other),
        };

        estimate.clone().map_err(ChainClientError::Estimation)
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        from: Address,
        gas: GasParams,
    ) -> Result<TxHash, ChainClientError> {
        assert_eq!(from, OWNER);

        if self.reject_submissions {
            return Err(ChainClientError::Submission("insufficient funds for gas".into()));
        }

        // Approvals take effect immediately, like a node that mined them
        if call.selector() == Some(IERC20::approveCall::SELECTOR) {
            let args = IERC20::approveCall::abi_decode(&call.calldata).unwrap();
            *self.allowance.lock().unwrap() = args.value;
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(Sent {
            method: call.method,
            calldata: call.calldata.clone(),
            gas,
        });

        Ok(B256::with_last_byte(sent.len() as u8))
    }
}

fn context(amount_in: &str) -> SwapContext {
    SwapContext {
        rpc_url: "http://localhost:8545".to_string(),
        token: TOKEN,
        router: ROUTER,
        wrapped_native: WETH,
        amount_in: amount_in.to_string(),
        recipient: None,
        expected_chain_id: 10,
        amount_out_min: U256::ZERO,
        deadline_window: Duration::from_secs(600),
        rpc_timeout: Duration::from_secs(20),
    }
}

fn interactor(chain: &Arc<MockChain>, context: SwapContext) -> SwapInteractorImpl<MockChain> {
    SwapInteractorImpl::new(chain.clone(), context, OWNER)
}

fn decode_swap(sent: &Sent) -> IUniswapV2Router02::swapExactTokensForETHCall {
    assert_eq!(sent.method, "swapExactTokensForETH(uint256,uint256,address[],address,uint256)");
    IUniswapV2Router02::swapExactTokensForETHCall::abi_decode(&sent.calldata).unwrap()
}

// 0.0005 at 6 decimals is 500 base units

#[tokio::test]
async fn existing_allowance_skips_approval() {
    let chain = Arc::new(MockChain::new(1000, 1000));

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert!(report.approval.is_none());

    let swap = decode_swap(&sent[0]);
    assert_eq!(swap.amountIn, U256::from(500u64));
    assert_eq!(swap.amountOutMin, U256::ZERO);
    assert_eq!(swap.path, vec![TOKEN, WETH]);
    assert_eq!(swap.to, OWNER);
    assert_eq!(report.amount_in, U256::from(500u64));
    assert_eq!(report.swap_gas.source, GasSource::Estimated);
    assert_eq!(sent[0].gas, GasParams { gas_limit: 180_000, gas_price: GAS_PRICE });
}

#[tokio::test]
async fn missing_allowance_approves_then_swaps() {
    let chain = Arc::new(MockChain::new(1000, 0));

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 2);

    assert_eq!(sent[0].method, "approve(address,uint256)");
    let approve = IERC20::approveCall::abi_decode(&sent[0].calldata).unwrap();
    assert_eq!(approve.spender, ROUTER);
    assert_eq!(approve.value, U256::from(500u64));
    assert_eq!(sent[0].gas.gas_limit, 46_000);

    assert_eq!(decode_swap(&sent[1]).amountIn, U256::from(500u64));

    let approval = report.approval.expect("approval recorded");
    assert_eq!(approval.tx_hash, B256::with_last_byte(1));
    assert_eq!(report.swap_tx_hash, B256::with_last_byte(2));
}

#[tokio::test]
async fn partial_allowance_is_topped_up_to_exact_amount() {
    let chain = Arc::new(MockChain::new(1000, 499));

    interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    let sent = chain.sent();
    let approve = IERC20::approveCall::abi_decode(&sent[0].calldata).unwrap();
    assert_eq!(approve.value, U256::from(500u64));
}

#[tokio::test]
async fn insufficient_balance_submits_nothing() {
    let chain = Arc::new(MockChain::new(100, 0));

    let err = interactor(&chain, context("0.0005")).execute_swap().await.unwrap_err();

    match err {
        SwapError::InsufficientBalance {
            symbol,
            balance,
            required,
        } => {
            assert_eq!(symbol, "USDC");
            assert_eq!(balance, "100");
            assert_eq!(required, "500");
        }
        other => panic!("expected InsufficientBalance, got {other:?}"),
    }
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn failed_swap_estimate_uses_fallback_and_still_submits() {
    let mut chain = MockChain::new(1000, 1000);
    chain.swap_estimate = Err("execution reverted".to_string());
    let chain = Arc::new(chain);

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    let sent = chain.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].gas.gas_limit, 250_000);
    assert_eq!(report.swap_gas.source, GasSource::FallbackAfterError);
}

#[tokio::test]
async fn zero_swap_estimate_uses_fallback() {
    let mut chain = MockChain::new(1000, 1000);
    chain.swap_estimate = Ok(0);
    let chain = Arc::new(chain);

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    assert_eq!(chain.sent()[0].gas.gas_limit, 250_000);
    assert_eq!(report.swap_gas.source, GasSource::FallbackAfterZero);
}

#[tokio::test]
async fn failed_approve_estimate_uses_approve_fallback() {
    let mut chain = MockChain::new(1000, 0);
    chain.approve_estimate = Err("header not found".to_string());
    let chain = Arc::new(chain);

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    assert_eq!(chain.sent()[0].gas.gas_limit, 60_000);
    assert_eq!(
        report.approval.unwrap().gas.source,
        GasSource::FallbackAfterError
    );
}

#[tokio::test]
async fn repeated_runs_do_not_reapprove() {
    let chain = Arc::new(MockChain::new(1000, 0));
    let swapper = interactor(&chain, context("0.0005"));

    swapper.execute_swap().await.unwrap();
    swapper.execute_swap().await.unwrap();
    swapper.execute_swap().await.unwrap();

    let approvals = chain
        .sent()
        .iter()
        .filter(|sent| sent.method.starts_with("approve"))
        .count();
    assert_eq!(approvals, 1);
    assert_eq!(chain.sent().len(), 4);
}

#[tokio::test]
async fn chain_mismatch_is_reported_but_not_fatal() {
    let mut chain = MockChain::new(1000, 1000);
    chain.chain_id = 8453;
    let chain = Arc::new(chain);

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    let mismatch = report.chain_mismatch.expect("mismatch recorded");
    assert_eq!((mismatch.expected, mismatch.actual), (10, 8453));
    assert_eq!(chain.sent().len(), 1);
}

#[tokio::test]
async fn unreadable_symbol_falls_back_to_empty() {
    let mut chain = MockChain::new(1000, 1000);
    chain.symbol = None;
    let chain = Arc::new(chain);

    let report = interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    assert_eq!(report.token.symbol, "");
    assert_eq!(report.token.label(), "TOKEN");
}

#[tokio::test]
async fn unreadable_decimals_is_fatal() {
    let mut chain = MockChain::new(1000, 1000);
    chain.decimals = None;
    let chain = Arc::new(chain);

    let err = interactor(&chain, context("0.0005")).execute_swap().await.unwrap_err();

    assert!(matches!(err, SwapError::TokenInfo(_)));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn rejected_submission_aborts_before_swap() {
    let mut chain = MockChain::new(1000, 0);
    chain.reject_submissions = true;
    let chain = Arc::new(chain);

    let err = interactor(&chain, context("0.0005")).execute_swap().await.unwrap_err();

    match err {
        SwapError::Submission { method, source } => {
            assert_eq!(method, "approve(address,uint256)");
            assert!(matches!(source, ChainClientError::Submission(_)));
        }
        other => panic!("expected Submission, got {other:?}"),
    }
}

#[tokio::test]
async fn rescaled_amount_is_used_for_every_check() {
    // 500 base units cover the request; the 18-decimal reading (5e14) would not
    let chain = Arc::new(MockChain::new(500, 500));

    interactor(&chain, context("0.0005")).execute_swap().await.unwrap();

    assert_eq!(decode_swap(&chain.sent()[0]).amountIn, U256::from(500u64));
}

#[tokio::test]
async fn invalid_amount_fails_before_any_submission() {
    let chain = Arc::new(MockChain::new(1000, 1000));

    let err = interactor(&chain, context("1e3")).execute_swap().await.unwrap_err();

    assert!(matches!(err, SwapError::InvalidAmount(_)));
    assert!(chain.sent().is_empty());
}

#[tokio::test]
async fn recipient_slippage_bound_and_deadline_reach_the_router() {
    let recipient = address!("000000000000000000000000000000000000dEaD");
    let chain = Arc::new(MockChain::new(1000, 1000));

    let mut ctx = context("0.0005");
    ctx.recipient = Some(recipient);
    ctx.amount_out_min = U256::from(42u64);

    let before = chrono::Utc::now().timestamp() as u64;
    interactor(&chain, ctx).execute_swap().await.unwrap();
    let after = chrono::Utc::now().timestamp() as u64;

    let swap = decode_swap(&chain.sent()[0]);
    assert_eq!(swap.to, recipient);
    assert_eq!(swap.amountOutMin, U256::from(42u64));
    assert!(swap.deadline >= U256::from(before + 600));
    assert!(swap.deadline <= U256::from(after + 600));
}
