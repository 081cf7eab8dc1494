use std::sync::Arc;

use ethers::{
    abi::{parse_abi, Abi, Detokenize},
    contract::{Contract, ContractCall},
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::gateway::{GatewayError, TransactionHandle};
use crate::common::formatting::recipient_hex;
use crate::constants::{ENG_SWAP_ABI, ERC20_ABI};
use crate::types::{TxEvent, TxKind};

static ERC20: Lazy<Abi> = Lazy::new(|| parse_abi(ERC20_ABI).expect("static ERC20 ABI"));
static ENG_SWAP: Lazy<Abi> = Lazy::new(|| parse_abi(ENG_SWAP_ABI).expect("static EngSwap ABI"));

fn contract_error(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::Contract(e.to_string())
}

/// ENG ERC-20 토큰 컨트랙트
pub struct EngTokenContract<M> {
    contract: Contract<M>,
}

impl<M: Middleware + 'static> EngTokenContract<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        Self {
            contract: Contract::new(address, ERC20.clone(), client),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// 잔고 조회 (grains)
    pub async fn balance_of(&self, owner: Address) -> Result<U256, GatewayError> {
        self.contract
            .method::<_, U256>("balanceOf", owner)
            .map_err(contract_error)?
            .call()
            .await
            .map_err(contract_error)
    }

    /// allowance 조회 (grains)
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, GatewayError> {
        self.contract
            .method::<_, U256>("allowance", (owner, spender))
            .map_err(contract_error)?
            .call()
            .await
            .map_err(contract_error)
    }

    pub fn approve(&self, spender: Address, amount: U256, gas: u64) -> Result<ContractCall<M, bool>, GatewayError> {
        Ok(self
            .contract
            .method::<_, bool>("approve", (spender, amount))
            .map_err(contract_error)?
            .gas(gas))
    }
}

/// EngSwap 소각 컨트랙트
pub struct EngSwapContract<M> {
    contract: Contract<M>,
}

impl<M: Middleware + 'static> EngSwapContract<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        Self {
            contract: Contract::new(address, ENG_SWAP.clone(), client),
        }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    /// 소각 대상 ENG 토큰 주소
    pub async fn token(&self) -> Result<Address, GatewayError> {
        self.contract
            .method::<_, Address>("token", ())
            .map_err(contract_error)?
            .call()
            .await
            .map_err(contract_error)
    }

    /// recipient는 ASCII bytes 그대로 전달된다
    pub fn burn_funds(&self, recipient: &str, amount: U256, gas: u64) -> Result<ContractCall<M, ()>, GatewayError> {
        debug!("🔥 burnFunds({}, {})", recipient_hex(recipient), amount);
        let payload = Bytes::from(recipient.as_bytes().to_vec());
        Ok(self
            .contract
            .method::<_, ()>("burnFunds", (payload, amount))
            .map_err(contract_error)?
            .gas(gas))
    }
}

/// 트랜잭션을 백그라운드에서 전송하고 라이프사이클 이벤트를 핸들로 전달
pub fn spawn_send<M, D>(kind: TxKind, call: ContractCall<M, D>) -> TransactionHandle
where
    M: Middleware + 'static,
    D: Detokenize + Send + Sync + 'static,
{
    let (events, handle) = TransactionHandle::channel(kind);

    tokio::spawn(async move {
        let pending = match call.send().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!("⚠️ {} 트랜잭션 전송 실패: {}", kind, e);
                let _ = events.send(TxEvent::Failed(e.to_string()));
                return;
            }
        };

        let hash = pending.tx_hash();
        let _ = events.send(TxEvent::Submitted(hash));

        let event = match pending.await {
            Ok(Some(receipt)) => TxEvent::Confirmed {
                hash,
                success: receipt.status.map_or(false, |s| s.as_u64() == 1),
            },
            Ok(None) => TxEvent::Failed(format!("{} transaction dropped from mempool", kind)),
            Err(e) => TxEvent::Failed(e.to_string()),
        };
        let _ = events.send(event);
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_abis_parse() {
        assert!(ERC20.function("balanceOf").is_ok());
        assert!(ERC20.function("allowance").is_ok());
        assert!(ERC20.function("approve").is_ok());
        assert!(ENG_SWAP.function("token").is_ok());
        assert!(ENG_SWAP.function("burnFunds").is_ok());
    }

    #[test]
    fn test_burn_funds_signature() {
        let function = ENG_SWAP.function("burnFunds").unwrap();
        assert_eq!(function.signature(), "burnFunds(bytes,uint256)");
    }
}
