// 주소 형식
pub const DEFAULT_ADDRESS_PREFIX: &str = "secret";
pub const ADDRESS_LENGTH: usize = 45;

// ENG 토큰 정밀도 (1 ENG = 10^8 grains)
pub const TOKEN_DECIMALS: u32 = 8;
pub const TOKEN_SYMBOL: &str = "ENG";
pub const MIN_SWAP_AMOUNT: &str = "1";

// Gas limits (가스 추정 없이 고정값 사용)
pub const APPROVE_GAS_LIMIT: u64 = 50_000;
pub const BURN_GAS_LIMIT: u64 = 100_000;

// Explorer URLs
pub const ETHERSCAN_MAINNET: &str = "http://etherscan.io/tx/";
pub const ETHERSCAN_RINKEBY: &str = "http://rinkeby.etherscan.io/tx/";
pub const MAINNET_CHAIN_ID: u64 = 1;

// 지갑 에러 메시지 패턴
pub const USER_DENIED_SIGNATURE: &str = "User denied transaction signature";
pub const INSUFFICIENT_FUNDS: &str = "insufficient funds";

// ABI (human-readable)
pub const ERC20_ABI: &[&str] = &[
    "function balanceOf(address owner) external view returns (uint256)",
    "function allowance(address owner, address spender) external view returns (uint256)",
    "function approve(address spender, uint256 amount) external returns (bool)",
];

pub const ENG_SWAP_ABI: &[&str] = &[
    "function token() external view returns (address)",
    "function burnFunds(bytes recipient, uint256 amount) external",
];
