use ethers::types::H256;
use num_bigint::BigUint;

use super::math::format_grains;
use crate::constants::TOKEN_SYMBOL;

/// Format grains as a human readable ENG amount
pub fn format_eng(grains: &BigUint, decimals: u32) -> String {
    format!("{} {}", format_grains(grains, decimals), TOKEN_SYMBOL)
}

/// 트랜잭션 explorer 링크
pub fn explorer_tx_url(base_url: &str, tx_hash: H256) -> String {
    format!("{}{:?}", base_url, tx_hash)
}

/// burnFunds에 넘기는 recipient bytes의 hex 표현 (0x 접두사 포함)
pub fn recipient_hex(recipient: &str) -> String {
    format!("0x{}", hex::encode(recipient.as_bytes()))
}
