use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use tokio::sync::{Notify, RwLock};
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use super::MockConfig;
use crate::blockchain::{GatewayError, SwapGateway, TransactionHandle};
use crate::types::{TxEvent, TxKind};

/// 트랜잭션별 모의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    #[default]
    Succeed,
    /// 지갑에서 서명 거부
    RejectSignature,
    /// 가스비 부족으로 전송 실패
    InsufficientFunds,
    /// 블록에 포함되었지만 status = 0
    Revert,
}

#[derive(Debug, Default)]
struct MockLedger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    burns: Vec<(String, U256)>,
    approvals: usize,
    nonce: u64,
}

impl MockLedger {
    fn next_hash(&mut self) -> H256 {
        self.nonce += 1;
        H256::from_low_u64_be(self.nonce)
    }
}

/// 인메모리 ENG 토큰 + EngSwap 컨트랙트
#[derive(Clone)]
pub struct MockSwapGateway {
    account: Option<Address>,
    chain_id: u64,
    swap_contract: Address,
    token: Address,
    ledger: Arc<RwLock<MockLedger>>,
    approve_behavior: MockBehavior,
    burn_behavior: MockBehavior,
    burn_gate: Option<Arc<Notify>>,
    tx_delay: Duration,
}

impl MockSwapGateway {
    pub fn new(account: Address) -> Self {
        Self {
            account: Some(account),
            chain_id: 4,
            swap_contract: Address::from_low_u64_be(0x5a9),
            token: Address::from_low_u64_be(0xe9),
            ledger: Arc::new(RwLock::new(MockLedger::default())),
            approve_behavior: MockBehavior::Succeed,
            burn_behavior: MockBehavior::Succeed,
            burn_gate: None,
            tx_delay: Duration::ZERO,
        }
    }

    /// 서명 계정이 없는 게이트웨이
    pub fn read_only() -> Self {
        Self {
            account: None,
            ..Self::new(Address::zero())
        }
    }

    /// 환경변수 기반 데모용 게이트웨이
    pub fn from_mock_config(config: &MockConfig) -> Self {
        let account = Address::from_low_u64_be(0xd3);
        let balance = U256::from(config.eng_balance) * U256::exp10(crate::constants::TOKEN_DECIMALS as usize);

        info!("🎭 MockSwapGateway initialized (chain {})", config.chain_id);
        debug!("Mock ENG balance: {}", config.eng_balance);

        let mut gateway = Self::new(account).with_chain_id(config.chain_id).with_balance(account, balance);
        gateway.tx_delay = Duration::from_millis(config.tx_delay_ms);
        gateway
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_swap_contract(mut self, swap_contract: Address) -> Self {
        self.swap_contract = swap_contract;
        self
    }

    pub fn with_balance(self, owner: Address, balance: U256) -> Self {
        if let Ok(mut ledger) = self.ledger.try_write() {
            ledger.balances.insert(owner, balance);
        }
        self
    }

    /// swap 컨트랙트에 대한 기존 allowance
    pub fn with_allowance(self, owner: Address, allowance: U256) -> Self {
        let spender = self.swap_contract;
        if let Ok(mut ledger) = self.ledger.try_write() {
            ledger.allowances.insert((owner, spender), allowance);
        }
        self
    }

    pub fn with_approve_behavior(mut self, behavior: MockBehavior) -> Self {
        self.approve_behavior = behavior;
        self
    }

    pub fn with_burn_behavior(mut self, behavior: MockBehavior) -> Self {
        self.burn_behavior = behavior;
        self
    }

    /// burn 확정을 gate가 열릴 때까지 보류
    pub fn with_burn_gate(mut self, gate: Arc<Notify>) -> Self {
        self.burn_gate = Some(gate);
        self
    }

    pub async fn balance(&self, owner: Address) -> U256 {
        self.ledger.read().await.balances.get(&owner).copied().unwrap_or_default()
    }

    pub async fn burns(&self) -> Vec<(String, U256)> {
        self.ledger.read().await.burns.clone()
    }

    pub async fn approval_count(&self) -> usize {
        self.ledger.read().await.approvals
    }

    fn signer(&self) -> Result<Address, GatewayError> {
        self.account.ok_or(GatewayError::NoAccount)
    }

    fn rejection(behavior: MockBehavior) -> Option<String> {
        match behavior {
            MockBehavior::RejectSignature => {
                Some("MetaMask Tx Signature: User denied transaction signature.".to_string())
            }
            MockBehavior::InsufficientFunds => {
                Some("insufficient funds for gas * price + value".to_string())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl SwapGateway for MockSwapGateway {
    fn account(&self) -> Option<Address> {
        self.account
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn swap_contract(&self) -> Address {
        self.swap_contract
    }

    async fn token_address(&self) -> Result<Address, GatewayError> {
        Ok(self.token)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256, GatewayError> {
        Ok(self.balance(owner).await)
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, GatewayError> {
        let ledger = self.ledger.read().await;
        Ok(ledger.allowances.get(&(owner, spender)).copied().unwrap_or_default())
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionHandle, GatewayError> {
        let owner = self.signer()?;
        let (sender, handle) = TransactionHandle::channel(TxKind::Approve);

        if let Some(message) = Self::rejection(self.approve_behavior) {
            let _ = sender.send(TxEvent::Failed(message));
            return Ok(handle);
        }

        let mut ledger = self.ledger.write().await;
        let hash = ledger.next_hash();
        let success = self.approve_behavior == MockBehavior::Succeed;
        if success {
            ledger.allowances.insert((owner, spender), amount);
            ledger.approvals += 1;
        }
        drop(ledger);

        debug!("🎭 [MOCK] approve {} → {:?}", amount, spender);
        let _ = sender.send(TxEvent::Submitted(hash));
        let _ = sender.send(TxEvent::Confirmed { hash, success });
        Ok(handle)
    }

    async fn burn(&self, recipient: &str, amount: U256) -> Result<TransactionHandle, GatewayError> {
        let owner = self.signer()?;
        let (sender, handle) = TransactionHandle::channel(TxKind::Burn);

        if let Some(message) = Self::rejection(self.burn_behavior) {
            let _ = sender.send(TxEvent::Failed(message));
            return Ok(handle);
        }

        let hash = self.ledger.write().await.next_hash();
        let _ = sender.send(TxEvent::Submitted(hash));

        let ledger = self.ledger.clone();
        let behavior = self.burn_behavior;
        let gate = self.burn_gate.clone();
        let spender = self.swap_contract;
        let delay = self.tx_delay;
        let recipient = recipient.to_string();

        tokio::spawn(async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if !delay.is_zero() {
                sleep(delay).await;
            }

            let success = behavior == MockBehavior::Succeed && {
                let mut ledger = ledger.write().await;
                let balance = ledger.balances.get(&owner).copied().unwrap_or_default();
                let allowance = ledger.allowances.get(&(owner, spender)).copied().unwrap_or_default();
                if balance < amount || allowance < amount {
                    false
                } else {
                    ledger.balances.insert(owner, balance - amount);
                    ledger.allowances.insert((owner, spender), allowance - amount);
                    ledger.burns.push((recipient.clone(), amount));
                    true
                }
            };

            debug!("🎭 [MOCK] burnFunds {} → {} (success: {})", amount, recipient, success);
            let _ = sender.send(TxEvent::Confirmed { hash, success });
        });

        Ok(handle)
    }
}
