pub mod contracts;
pub mod gateway;
pub mod rpc;

pub use contracts::{EngSwapContract, EngTokenContract};
pub use gateway::{GatewayError, SwapGateway, TransactionHandle};
pub use rpc::{EthersSwapGateway, SignerClient};
