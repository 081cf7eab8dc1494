use std::fmt;

use chrono::{DateTime, Utc};
use ethers::types::H256;
use serde::{Deserialize, Serialize};

/// 알림 심각도
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// 트랜잭션 종류
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxKind {
    Approve,
    Burn,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Approve => write!(f, "Approve"),
            TxKind::Burn => write!(f, "Burn"),
        }
    }
}

/// 트랜잭션 라이프사이클 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxEvent {
    /// 브로드캐스트됨
    Submitted(H256),
    /// 블록 포함 (success = receipt status)
    Confirmed { hash: H256, success: bool },
    /// 서명 거부, 전송 실패 등
    Failed(String),
}

impl TxEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxEvent::Submitted(_))
    }
}

/// 완료된 스왑 결과
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapReceipt {
    pub approve_tx: Option<H256>,
    pub burn_tx: H256,
    pub amount_grains: String,
    pub recipient: String,
    pub explorer_url: String,
    /// burn 이후 다시 읽은 잔고 (grains, 조회 실패 시 None)
    #[serde(default)]
    pub balance_after: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// 사용자에게 표시된 알림 기록
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_events() {
        assert!(!TxEvent::Submitted(H256::zero()).is_terminal());
        assert!(TxEvent::Confirmed { hash: H256::zero(), success: false }.is_terminal());
        assert!(TxEvent::Failed("boom".to_string()).is_terminal());
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Success).unwrap(), "\"success\"");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
