pub mod balance;
pub mod config;
pub mod consts;
mod errors;
pub mod gas;
pub mod history;
pub mod networks;
pub mod prelude;
pub mod readiness;
pub mod token;
pub mod transfer;

pub use balance::{
    Asset, Balance, BalanceFetcher, BalanceRequest, BalanceResolver, BalanceSnapshot,
    HolderAddresses, ResolvedBalances,
};
pub use config::BridgeConfig;
pub use errors::Error;
pub use gas::{GasEstimator, MaxAmount, MaxAmountEstimator, MaxAmountOutcome, PendingMaxAmount};
pub use networks::{Chain, ChainCategory, ChainId, NetworkCatalog};
pub use readiness::{TransferPolicy, TransferReadiness, TransferReadinessEvaluator};
pub use token::{NativeCurrency, TokenSelection};
pub use transfer::{
    ChainPairFilter, NetworkSelection, SelectionOutcome, SelectorRole, TransferDirection,
    TransferPanel, WalletKind,
};
