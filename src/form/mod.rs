//! 스왑 폼 검증
//!
//! 불변 `FormState`와 순수 전이 함수 `reduce`로 구성된다.

pub mod errors;
pub mod state;

pub use errors::{FormField, ValidationError, ValidationErrors};
pub use state::{reduce, FormEvent, FormSettings, FormState};
