mod resolver;
mod snapshot;

pub use resolver::{BalanceResolver, ChainBalances, HolderAddresses, ResolvedBalances};
pub use snapshot::{
    Asset, Balance, BalanceFetcher, BalanceKey, BalanceRequest, BalanceSnapshot,
};
