//! 공통 유틸리티 모듈
//!
//! 목적지 주소 검증, grains 단위 변환, 표시용 포맷팅 함수를 포함합니다.
//! 모든 함수는 순수 함수이며 I/O가 없습니다.

pub mod formatting;
pub mod math;
pub mod validation;

pub use formatting::*;
pub use math::*;
pub use validation::*;
