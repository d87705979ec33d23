//! Chain identifiers and well-known token addresses

use ethers::types::Address;
use lazy_static::lazy_static;

use crate::networks::ChainId;

pub const ETHEREUM: ChainId = 1;
pub const GOERLI: ChainId = 5;
pub const SEPOLIA: ChainId = 11_155_111;
pub const LOCAL: ChainId = 1337;
pub const ARBITRUM_ONE: ChainId = 42_161;
pub const ARBITRUM_NOVA: ChainId = 42_170;
pub const ARBITRUM_GOERLI: ChainId = 421_613;
pub const ARBITRUM_SEPOLIA: ChainId = 421_614;
pub const ARBITRUM_LOCAL: ChainId = 412_346;
pub const XAI: ChainId = 660_279;
pub const XAI_TESTNET: ChainId = 47_279_324_479;
pub const STYLUS_TESTNET: ChainId = 23_011_913;

/// Multiplier applied to estimated gas fees before subtracting them from a native balance
pub const GAS_SAFETY_FACTOR: f64 = 1.4;

/// Transactions younger than this are highlighted in the history table
pub const HIGHLIGHT_WINDOW_SECS: i64 = 20;

/// Decimals used for ETH and when a token does not report its own
pub const ETHER_DECIMALS: u32 = 18;
pub const DEFAULT_ERC20_DECIMALS: u32 = 18;
pub const USDC_DECIMALS: u32 = 6;

/// USDC contract addresses
pub const USDC_ETHEREUM: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const USDC_GOERLI: &str = "0x07865c6E87B9F70255377e024ace6630C1Eaa37F";
pub const USDC_ARBITRUM_ONE: &str = "0xaf88d065e77c8cC2239327C5EDb3A432268e5831";
pub const USDC_E_ARBITRUM_ONE: &str = "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8";
pub const USDC_ARBITRUM_GOERLI: &str = "0x179522635726710Dd7D2035a81d856de4Aa7836c";
pub const USDC_E_ARBITRUM_GOERLI: &str = "0x8FB1E3fC51F3b789dED7557E680551d93Ea9d892";

/// XAI, the gas token of the Xai Orbit chain, on Arbitrum One
pub const XAI_ARBITRUM_ONE: &str = "0x4Cb9a7AE498CEDcBb5EAe9f25736aE7d428C9D66";

pub const SUPPORT_DISCORD_URL: &str = "https://discord.com/invite/ZpZuw7p";

lazy_static! {
    pub static ref ETHEREUM_USDC: Address = USDC_ETHEREUM.parse().unwrap();
    pub static ref GOERLI_USDC: Address = USDC_GOERLI.parse().unwrap();
    pub static ref ARBITRUM_ONE_USDC: Address = USDC_ARBITRUM_ONE.parse().unwrap();
    pub static ref ARBITRUM_ONE_USDC_E: Address = USDC_E_ARBITRUM_ONE.parse().unwrap();
    pub static ref ARBITRUM_GOERLI_USDC: Address = USDC_ARBITRUM_GOERLI.parse().unwrap();
    pub static ref ARBITRUM_GOERLI_USDC_E: Address = USDC_E_ARBITRUM_GOERLI.parse().unwrap();
    pub static ref XAI_TOKEN_ARBITRUM_ONE: Address = XAI_ARBITRUM_ONE.parse().unwrap();
}
