use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use alloy::transports::http::{reqwest, Http};
use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use crate::entity::GasParams;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("gas estimation failed: {0}")]
    Estimation(String),

    #[error("signing or broadcast failed: {0}")]
    Submission(String),

    #[error("failed to decode {method} result: {reason}")]
    Decode { method: String, reason: String },
}

/// An ABI-encoded call against a single contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: Address,
    /// Solidity signature, e.g. `approve(address,uint256)`
    pub method: &'static str,
    pub calldata: Bytes,
}

impl ContractCall {
    pub fn new<C: SolCall>(to: Address, call: C) -> Self {
        Self {
            to,
            method: C::SIGNATURE,
            calldata: call.abi_encode().into(),
        }
    }

    /// First four bytes of the calldata
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.calldata.get(..4)?.try_into().ok()
    }
}

/// Remote node access used by the swap pipeline.
///
/// Every call waits for the node to answer or for the transport timeout.
/// Implementations never retry.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn chain_id(&self) -> Result<u64, ChainClientError>;

    async fn gas_price(&self) -> Result<u128, ChainClientError>;

    /// `eth_call` without state change, returns the raw ABI-encoded output
    async fn read_contract(&self, call: &ContractCall) -> Result<Bytes, ChainClientError>;

    /// Fails with `Estimation` when the node cannot simulate the call
    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<u64, ChainClientError>;

    /// Signs and broadcasts; returns as soon as the node accepts the transaction
    async fn send_transaction(
        &self,
        call: &ContractCall,
        from: Address,
        gas: GasParams,
    ) -> Result<TxHash, ChainClientError>;
}

/// Run a view call and decode its typed return value
pub async fn call_view<T, C>(
    client: &C,
    to: Address,
    call: T,
) -> Result<T::Return, ChainClientError>
where
    T: SolCall,
    C: ChainClient + ?Sized,
{
    let request = ContractCall::new(to, call);
    let output = client.read_contract(&request).await?;

    T::abi_decode_returns(&output).map_err(|e| ChainClientError::Decode {
        method: request.method.to_string(),
        reason: e.to_string(),
    })
}

/// JSON-RPC backed client signing with a local private key
pub struct RpcChainClient {
    provider: DynProvider,
}

impl RpcChainClient {
    /// Build an HTTP provider with the signer attached as wallet.
    ///
    /// Nonce and chain id are filled by the provider; gas is always passed in explicitly.
    pub fn connect(
        rpc_url: &str,
        signer: PrivateKeySigner,
        timeout: Duration,
    ) -> Result<Self, ChainClientError> {
        let url: reqwest::Url = rpc_url
            .parse()
            .map_err(|e| ChainClientError::Transport(format!("Invalid RPC URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ChainClientError::Transport(format!("Failed to build HTTP client: {}", e))
            })?;

        let transport = Http::with_client(http_client, url);
        let rpc_client = RpcClient::new(transport, false);

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_client(rpc_client)
            .erased();

        Ok(Self { provider })
    }

    fn request(call: &ContractCall) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.calldata.clone())
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn chain_id(&self) -> Result<u64, ChainClientError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainClientError::Transport(format!("eth_chainId: {}", e)))
    }

    async fn gas_price(&self) -> Result<u128, ChainClientError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ChainClientError::Transport(format!("eth_gasPrice: {}", e)))
    }

    async fn read_contract(&self, call: &ContractCall) -> Result<Bytes, ChainClientError> {
        debug!("eth_call {} on {}", call.method, call.to);

        self.provider
            .call(Self::request(call))
            .await
            .map_err(|e| ChainClientError::Transport(format!("{}: {}", call.method, e)))
    }

    async fn estimate_gas(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<u64, ChainClientError> {
        let tx = Self::request(call).with_from(from);

        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| ChainClientError::Estimation(format!("{}: {}", call.method, e)))
    }

    async fn send_transaction(
        &self,
        call: &ContractCall,
        from: Address,
        gas: GasParams,
    ) -> Result<TxHash, ChainClientError> {
        let tx = Self::request(call)
            .with_from(from)
            .with_gas_limit(gas.gas_limit)
            .with_gas_price(gas.gas_price);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainClientError::Submission(format!("{}: {}", call.method, e)))?;

        Ok(*pending.tx_hash())
    }
}
