pub mod gateway_mock;
pub mod notifier_mock;

pub use gateway_mock::{MockBehavior, MockSwapGateway};
pub use notifier_mock::RecordingNotifier;

use std::env;

/// Check if mock mode is enabled
pub fn is_mock_mode() -> bool {
    env::var("ENGSWAP_MODE").unwrap_or_default() == "mock"
}

/// Get mock configuration values
pub fn get_mock_config() -> MockConfig {
    MockConfig {
        chain_id: env::var("MOCK_CHAIN_ID")
            .unwrap_or_else(|_| "4".to_string())
            .parse()
            .unwrap_or(4),
        eng_balance: env::var("MOCK_ENG_BALANCE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .unwrap_or(100),
        tx_delay_ms: env::var("MOCK_TX_DELAY_MS")
            .unwrap_or_else(|_| "200".to_string())
            .parse()
            .unwrap_or(200),
    }
}

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub chain_id: u64,
    /// 시작 잔고 (ENG 단위)
    pub eng_balance: u64,
    /// 제출 → 확정 사이 지연
    pub tx_delay_ms: u64,
}
