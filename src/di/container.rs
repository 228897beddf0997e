use alloy::primitives::Address;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::entity::SwapError;
use crate::evm::client::RpcChainClient;
use crate::evm::wallet::signer_from_private_key;
use crate::interactor::swap_interactor::{SwapInteractor, SwapInteractorImpl};

/// ServiceContainer wires the signer and the RPC client into the swap interactor
pub struct ServiceContainer {
    account: Address,
    swap_interactor: Arc<dyn SwapInteractor>,
}

impl ServiceContainer {
    /// Build every dependency from validated configuration.
    ///
    /// No network call happens here; the first RPC request is made by the interactor.
    pub fn new(config: AppConfig) -> Result<Self, SwapError> {
        let signer = signer_from_private_key(&config.private_key)?;
        let account = signer.address();

        let chain_client = Arc::new(
            RpcChainClient::connect(&config.context.rpc_url, signer, config.context.rpc_timeout)
                .map_err(|e| SwapError::Config(e.to_string()))?,
        );

        let swap_interactor = Arc::new(SwapInteractorImpl::new(
            chain_client,
            config.context,
            account,
        )) as Arc<dyn SwapInteractor>;

        Ok(Self {
            account,
            swap_interactor,
        })
    }

    // Accessor methods

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn swap_interactor(&self) -> Arc<dyn SwapInteractor> {
        self.swap_interactor.clone()
    }
}
