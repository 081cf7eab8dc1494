// ENG → SCRT Swap Library

pub mod config;
pub mod constants;
pub mod types;
pub mod common;
pub mod form;
pub mod blockchain;
pub mod swap;
pub mod notification;
pub mod mocks;

// Re-exports for convenience
pub use config::Config;
pub use form::{reduce, FormEvent, FormSettings, FormState, ValidationErrors};
pub use blockchain::{EthersSwapGateway, GatewayError, SwapGateway, TransactionHandle};
pub use swap::{SwapError, SwapExecutor, SwapRequest};
pub use notification::{Notifier, TracingNotifier};

// Re-export common types
pub use common::formatting::*;
pub use common::math::*;
pub use common::validation::*;
pub use types::*;
