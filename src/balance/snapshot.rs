use std::collections::HashMap;

use async_trait::async_trait;
use ethers::types::{Address, U256};
use futures_util::future::join_all;
use log::{debug, warn};

use crate::networks::ChainId;
use crate::prelude::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The chain's own gas asset
    Native,
    Erc20(Address),
}

/// A fetched amount in the asset's smallest unit, or `Unknown` while it has not
/// been fetched yet. Unknown is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Balance {
    #[default]
    Unknown,
    Known(U256),
}

impl Balance {
    pub fn amount(self) -> Option<U256> {
        match self {
            Balance::Known(amount) => Some(amount),
            Balance::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Balance::Known(_))
    }

    /// Known and strictly positive.
    pub fn is_positive(self) -> bool {
        matches!(self, Balance::Known(amount) if !amount.is_zero())
    }
}

impl From<Option<U256>> for Balance {
    fn from(value: Option<U256>) -> Self {
        value.map_or(Balance::Unknown, Balance::Known)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BalanceKey {
    pub chain_id: ChainId,
    pub holder: Address,
    pub asset: Asset,
}

/// A read the surrounding app should perform to keep the snapshot current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRequest {
    pub chain_id: ChainId,
    pub holder: Address,
    pub assets: Vec<Asset>,
}

#[async_trait]
pub trait BalanceFetcher: Send + Sync {
    async fn fetch(&self, request: &BalanceRequest) -> Result<Vec<(Asset, U256)>>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSnapshot {
    balances: HashMap<BalanceKey, U256>,
}

impl BalanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chain_id: ChainId, holder: Address, asset: Asset) -> Balance {
        self.balances
            .get(&BalanceKey {
                chain_id,
                holder,
                asset,
            })
            .copied()
            .into()
    }

    pub fn set(&mut self, chain_id: ChainId, holder: Address, asset: Asset, amount: U256) {
        self.balances.insert(
            BalanceKey {
                chain_id,
                holder,
                asset,
            },
            amount,
        );
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Runs all requests concurrently and merges what came back. Returns the
    /// number of entries written; failed requests leave their entries as they were.
    pub async fn refresh<F>(&mut self, fetcher: &F, requests: &[BalanceRequest]) -> usize
    where
        F: BalanceFetcher + ?Sized,
    {
        let results = join_all(requests.iter().map(|request| fetcher.fetch(request))).await;

        let mut updated = 0;
        for (request, result) in requests.iter().zip(results) {
            match result {
                Ok(amounts) => {
                    for (asset, amount) in amounts {
                        self.set(request.chain_id, request.holder, asset, amount);
                        updated += 1;
                    }
                }
                Err(err) => warn!(
                    "Balance fetch for {:?} on chain {} failed: {}",
                    request.holder, request.chain_id, err
                ),
            }
        }
        debug!("Balance refresh wrote {updated} entries");
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FixedFetcher;

    #[async_trait]
    impl BalanceFetcher for FixedFetcher {
        async fn fetch(&self, request: &BalanceRequest) -> Result<Vec<(Asset, U256)>> {
            if request.chain_id == 2 {
                return Err(Error::BalanceFetch("rpc down".to_string()));
            }
            Ok(request
                .assets
                .iter()
                .map(|asset| (*asset, U256::from(7)))
                .collect())
        }
    }

    #[test]
    fn test_missing_entry_is_unknown_not_zero() {
        let mut snapshot = BalanceSnapshot::new();
        let holder = Address::repeat_byte(1);
        assert_eq!(snapshot.get(1, holder, Asset::Native), Balance::Unknown);

        snapshot.set(1, holder, Asset::Native, U256::zero());
        assert_eq!(snapshot.get(1, holder, Asset::Native), Balance::Known(U256::zero()));
        assert!(!snapshot.get(1, holder, Asset::Native).is_positive());
    }

    #[tokio::test]
    async fn test_refresh_skips_failed_requests() {
        let holder = Address::repeat_byte(2);
        let token = Address::repeat_byte(9);
        let requests = vec![
            BalanceRequest {
                chain_id: 1,
                holder,
                assets: vec![Asset::Native, Asset::Erc20(token)],
            },
            BalanceRequest {
                chain_id: 2,
                holder,
                assets: vec![Asset::Native],
            },
        ];

        let mut snapshot = BalanceSnapshot::new();
        let updated = snapshot.refresh(&FixedFetcher, &requests).await;

        assert_eq!(updated, 2);
        assert_eq!(
            snapshot.get(1, holder, Asset::Erc20(token)),
            Balance::Known(U256::from(7))
        );
        assert_eq!(snapshot.get(2, holder, Asset::Native), Balance::Unknown);
    }
}
