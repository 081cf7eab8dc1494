//! ENG 소각 스왑 실행
//!
//! allowance 확인 → (필요 시) approve → burnFunds 순서로 진행하며,
//! 각 트랜잭션의 라이프사이클 이벤트를 알림으로 변환한다.

pub mod errors;
pub mod executor;

pub use errors::{categorize_failure, SwapError};
pub use executor::{SwapExecutor, SwapRequest};
