use async_trait::async_trait;
use ethers::types::{Address, U256};
use tokio::sync::mpsc;

use crate::types::{TxEvent, TxKind};

/// 지갑/컨트랙트 게이트웨이 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Signer error: {0}")]
    Signer(String),

    #[error("Network is unsupported (chain id {chain_id})")]
    UnsupportedNetwork { chain_id: u64 },

    #[error("No account available for signing")]
    NoAccount,
}

/// 제출된 트랜잭션의 라이프사이클 이벤트 수신기
#[derive(Debug)]
pub struct TransactionHandle {
    kind: TxKind,
    events: mpsc::UnboundedReceiver<TxEvent>,
}

impl TransactionHandle {
    /// 이벤트 송신자와 핸들을 함께 생성
    pub fn channel(kind: TxKind) -> (mpsc::UnboundedSender<TxEvent>, Self) {
        let (sender, events) = mpsc::unbounded_channel();
        (sender, Self { kind, events })
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    /// 다음 이벤트 (송신자가 닫히면 None)
    pub async fn next_event(&mut self) -> Option<TxEvent> {
        self.events.recv().await
    }

    /// 종료 이벤트(Confirmed/Failed)까지 대기
    pub async fn wait(mut self) -> TxEvent {
        while let Some(event) = self.next_event().await {
            if event.is_terminal() {
                return event;
            }
        }
        TxEvent::Failed(format!("{} transaction channel closed", self.kind))
    }
}

/// ENG 토큰 / EngSwap 컨트랙트 접근 인터페이스
#[async_trait]
pub trait SwapGateway: Send + Sync {
    /// 서명 계정 (읽기 전용이면 None)
    fn account(&self) -> Option<Address>;

    fn chain_id(&self) -> u64;

    /// EngSwap 컨트랙트 주소 (approve 대상)
    fn swap_contract(&self) -> Address;

    /// EngSwap이 소각하는 ENG 토큰 주소
    async fn token_address(&self) -> Result<Address, GatewayError>;

    async fn balance_of(&self, owner: Address) -> Result<U256, GatewayError>;

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, GatewayError>;

    async fn approve(&self, spender: Address, amount: U256) -> Result<TransactionHandle, GatewayError>;

    /// burnFunds(recipient ASCII bytes, amount)
    async fn burn(&self, recipient: &str, amount: U256) -> Result<TransactionHandle, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::H256;

    #[tokio::test]
    async fn test_handle_waits_for_terminal_event() {
        let (sender, handle) = TransactionHandle::channel(TxKind::Burn);
        let hash = H256::from_low_u64_be(9);
        sender.send(TxEvent::Submitted(hash)).unwrap();
        sender.send(TxEvent::Confirmed { hash, success: true }).unwrap();

        assert_eq!(handle.wait().await, TxEvent::Confirmed { hash, success: true });
    }

    #[tokio::test]
    async fn test_handle_closed_channel() {
        let (sender, handle) = TransactionHandle::channel(TxKind::Approve);
        drop(sender);

        match handle.wait().await {
            TxEvent::Failed(message) => assert!(message.contains("Approve")),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
