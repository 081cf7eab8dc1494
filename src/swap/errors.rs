use ethers::types::H256;
use tracing::error;

use crate::blockchain::GatewayError;
use crate::common::math::AmountError;
use crate::constants::{INSUFFICIENT_FUNDS, USER_DENIED_SIGNATURE};
use crate::form::ValidationError;
use crate::types::TxKind;

/// 스왑 실행 에러
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwapError {
    #[error("A swap is already in progress")]
    AlreadyInFlight,

    #[error("Form validation failed: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Invalid amount: {0}")]
    Amount(#[from] AmountError),

    #[error("{kind} transaction rejected: {message}")]
    Rejected { kind: TxKind, message: String },

    #[error("{kind} transaction reverted: {hash:?}")]
    Reverted { kind: TxKind, hash: H256 },
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl SwapError {
    /// 사용자에게 보여줄 메시지
    pub fn user_message(&self) -> String {
        match self {
            SwapError::AlreadyInFlight => self.to_string(),
            SwapError::Invalid(errors) => join_messages(errors),
            SwapError::Gateway(GatewayError::UnsupportedNetwork { .. }) => "Network is unsupported".to_string(),
            SwapError::Gateway(e) => categorize_failure(&e.to_string()).to_string(),
            SwapError::Amount(_) => "Invalid swap amount".to_string(),
            SwapError::Rejected { message, .. } => categorize_failure(message).to_string(),
            SwapError::Reverted { kind: TxKind::Approve, .. } => "Failed to approve ENG burn".to_string(),
            SwapError::Reverted { kind: TxKind::Burn, .. } => "ENG Burn failed".to_string(),
        }
    }
}

/// 지갑/노드 에러 메시지 분류
pub fn categorize_failure(message: &str) -> &'static str {
    error!("Contract error: {}", message);
    if message.contains(USER_DENIED_SIGNATURE) {
        "Failed to sign the transaction"
    } else if message.to_lowercase().contains(INSUFFICIENT_FUNDS) {
        "Deposit ETH for gas"
    } else {
        "Swap failed. Check console logs."
    }
}
