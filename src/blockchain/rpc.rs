use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, U256},
};
use tracing::{info, warn};

use super::contracts::{spawn_send, EngSwapContract, EngTokenContract};
use super::gateway::{GatewayError, SwapGateway, TransactionHandle};
use crate::config::Config;
use crate::types::TxKind;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// ethers 기반 게이트웨이
///
/// 연결 시 체인 ID로 EngSwap 배포를 찾고, `token()`으로 ENG 토큰 주소를 읽어둔다.
pub struct EthersSwapGateway<M> {
    chain_id: u64,
    account: Option<Address>,
    swap: EngSwapContract<M>,
    token: EngTokenContract<M>,
    approve_gas_limit: u64,
    burn_gas_limit: u64,
}

fn provider(config: &Config) -> Result<Provider<Http>, GatewayError> {
    Provider::<Http>::try_from(config.network.rpc_url.as_str()).map_err(|e| GatewayError::Rpc(e.to_string()))
}

impl EthersSwapGateway<Provider<Http>> {
    /// 서명 없이 조회만 가능한 게이트웨이
    pub async fn connect_read_only(config: &Config) -> Result<Self, GatewayError> {
        info!("🔌 읽기 전용 RPC 연결: {}", config.network.rpc_url);
        Self::from_client(Arc::new(provider(config)?), None, config).await
    }
}

impl EthersSwapGateway<SignerClient> {
    /// private key로 서명하는 게이트웨이
    pub async fn connect_with_signer(config: &Config) -> Result<Self, GatewayError> {
        let private_key = config.network.private_key.as_deref().ok_or(GatewayError::NoAccount)?;
        let wallet: LocalWallet = private_key
            .parse()
            .map_err(|e| GatewayError::Signer(format!("Invalid private key: {}", e)))?;

        info!("🔌 RPC 연결: {}", config.network.rpc_url);
        let client = SignerMiddleware::new_with_provider_chain(provider(config)?, wallet)
            .await
            .map_err(|e| GatewayError::Signer(e.to_string()))?;
        let account = client.signer().address();
        info!("🔑 Wallet 초기화 완료: {:?}", account);

        Self::from_client(Arc::new(client), Some(account), config).await
    }
}

impl<M: Middleware + 'static> EthersSwapGateway<M> {
    pub async fn from_client(client: Arc<M>, account: Option<Address>, config: &Config) -> Result<Self, GatewayError> {
        let chain_id = client
            .get_chainid()
            .await
            .map_err(|e| GatewayError::Rpc(e.to_string()))?
            .as_u64();
        info!("🔗 체인 ID: {}", chain_id);

        let deployment = config.deployment_for(chain_id).ok_or_else(|| {
            warn!("⚠️ 지원하지 않는 네트워크: {}", chain_id);
            GatewayError::UnsupportedNetwork { chain_id }
        })?;

        let swap = EngSwapContract::new(deployment.swap_contract, Arc::clone(&client));
        let token_address = swap.token().await?;
        info!("🪙 Swapping with ENG contract at address: {:?}", token_address);
        let token = EngTokenContract::new(token_address, client);

        Ok(Self {
            chain_id,
            account,
            swap,
            token,
            approve_gas_limit: config.swap.approve_gas_limit,
            burn_gas_limit: config.swap.burn_gas_limit,
        })
    }
}

#[async_trait]
impl<M: Middleware + 'static> SwapGateway for EthersSwapGateway<M> {
    fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn swap_contract(&self) -> Address {
        self.swap.address()
    }

    async fn token_address(&self) -> Result<Address, GatewayError> {
        Ok(self.token.address())
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, GatewayError> {
        self.token.balance_of(owner).await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, GatewayError> {
        self.token.allowance(owner, spender).await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionHandle, GatewayError> {
        let account = self.account.ok_or(GatewayError::NoAccount)?;
        let call = self.token.approve(spender, amount, self.approve_gas_limit)?.from(account);
        Ok(spawn_send(TxKind::Approve, call))
    }

    async fn burn(&self, recipient: &str, amount: U256) -> Result<TransactionHandle, GatewayError> {
        let account = self.account.ok_or(GatewayError::NoAccount)?;
        let call = self.swap.burn_funds(recipient, amount, self.burn_gas_limit)?.from(account);
        Ok(spawn_send(TxKind::Burn, call))
    }
}
