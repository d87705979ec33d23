use ethers::types::{Address, U256};

use super::snapshot::{Asset, Balance, BalanceRequest, BalanceSnapshot};
use crate::consts;
use crate::networks::ChainId;
use crate::token::{self, NativeCurrency, TokenSelection};
use crate::transfer::{NetworksRelationship, TransferDirection};

/// Connected wallet and the optional custom destination address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HolderAddresses {
    pub wallet: Option<Address>,
    pub destination: Option<Address>,
}

impl HolderAddresses {
    pub fn destination_or_wallet(&self) -> Option<Address> {
        self.destination.or(self.wallet)
    }

    /// The wallet pays on the source side; the receiving side is the
    /// destination address when one is set.
    pub fn parent_holder(&self, direction: TransferDirection) -> Option<Address> {
        match direction {
            TransferDirection::Deposit => self.wallet,
            TransferDirection::Withdrawal => self.destination_or_wallet(),
        }
    }

    pub fn child_holder(&self, direction: TransferDirection) -> Option<Address> {
        match direction {
            TransferDirection::Deposit => self.destination_or_wallet(),
            TransferDirection::Withdrawal => self.wallet,
        }
    }
}

/// Balances displayed for one chain of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBalances {
    pub chain_id: ChainId,
    /// Selected token; `None` when no token is selected
    pub token: Option<Balance>,
    /// The child chain's gas asset as held on this chain
    pub native_currency: Balance,
    /// Plain ETH, listed next to a custom native currency on the parent chain
    pub eth: Option<Balance>,
    /// Native USDC on the child chain, shown alongside bridged USDC deposits
    pub native_usdc: Option<Balance>,
}

impl ChainBalances {
    /// Balance of the asset being transferred.
    pub fn transfer_asset(&self) -> Balance {
        self.token.unwrap_or(self.native_currency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBalances {
    pub direction: TransferDirection,
    pub parent: ChainBalances,
    pub child: ChainBalances,
}

impl ResolvedBalances {
    pub fn source(&self) -> &ChainBalances {
        match self.direction {
            TransferDirection::Deposit => &self.parent,
            TransferDirection::Withdrawal => &self.child,
        }
    }

    pub fn destination(&self) -> &ChainBalances {
        match self.direction {
            TransferDirection::Deposit => &self.child,
            TransferDirection::Withdrawal => &self.parent,
        }
    }

    pub fn source_balance(&self) -> Balance {
        self.source().transfer_asset()
    }

    pub fn destination_balance(&self) -> Balance {
        self.destination().transfer_asset()
    }

    /// The max button is offered only for a known, non-zero source balance.
    pub fn max_button_visible(&self) -> bool {
        self.source_balance().is_positive()
    }
}

/// Reads the balances for one parent/child pair out of a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct BalanceResolver {
    relationship: NetworksRelationship,
    holders: HolderAddresses,
}

impl BalanceResolver {
    pub fn new(relationship: NetworksRelationship, holders: HolderAddresses) -> Self {
        BalanceResolver {
            relationship,
            holders,
        }
    }

    fn parent_holder(&self) -> Option<Address> {
        self.holders.parent_holder(self.relationship.direction)
    }

    fn child_holder(&self) -> Option<Address> {
        self.holders.child_holder(self.relationship.direction)
    }

    pub fn resolve(
        &self,
        token: Option<&TokenSelection>,
        native_currency: &NativeCurrency,
        snapshot: &BalanceSnapshot,
    ) -> ResolvedBalances {
        let parent_chain = self.relationship.parent_chain;
        let child_chain = self.relationship.child_chain;
        let parent_holder = self.parent_holder();
        let child_holder = self.child_holder();

        let read = |chain_id: ChainId, holder: Option<Address>, asset: Asset| match holder {
            Some(holder) => snapshot.get(chain_id, holder, asset),
            None => Balance::Unknown,
        };

        let parent_eth = read(parent_chain, parent_holder, Asset::Native);
        let child_native = read(child_chain, child_holder, Asset::Native);

        let parent_native_currency = match native_currency.parent_address() {
            Some(address) => read(parent_chain, parent_holder, Asset::Erc20(address)),
            None => parent_eth,
        };

        let (parent_token, child_token) = match token {
            None => (None, None),
            Some(selected) => match token::native_usdc_origin(selected.address) {
                Some(origin) => (
                    Some(read(parent_chain, parent_holder, Asset::Erc20(origin))),
                    Some(read(child_chain, child_holder, Asset::Erc20(selected.address))),
                ),
                None => (
                    Some(read(parent_chain, parent_holder, Asset::Erc20(selected.address))),
                    Some(match selected.l2_address {
                        Some(l2_address) => {
                            read(child_chain, child_holder, Asset::Erc20(l2_address))
                        }
                        None => Balance::Unknown,
                    }),
                ),
            },
        };

        let native_usdc = self.native_usdc_address(token).map(|address| {
            match read(child_chain, child_holder, Asset::Erc20(address)) {
                Balance::Unknown if child_holder.is_some() => Balance::Known(U256::zero()),
                balance => balance,
            }
        });

        ResolvedBalances {
            direction: self.relationship.direction,
            parent: ChainBalances {
                chain_id: parent_chain,
                token: parent_token,
                native_currency: parent_native_currency,
                eth: native_currency.is_custom().then_some(parent_eth),
                native_usdc: None,
            },
            child: ChainBalances {
                chain_id: child_chain,
                token: child_token,
                native_currency: child_native,
                eth: None,
                native_usdc,
            },
        }
    }

    /// Native USDC on the child chain worth listing next to a bridged USDC deposit.
    fn native_usdc_address(&self, token: Option<&TokenSelection>) -> Option<Address> {
        if !self.relationship.direction.is_deposit() {
            return None;
        }
        let address = token?.address;
        match self.relationship.child_chain {
            consts::ARBITRUM_ONE if token::is_token_ethereum_usdc(address) => {
                Some(*consts::ARBITRUM_ONE_USDC)
            }
            consts::ARBITRUM_GOERLI if token::is_token_goerli_usdc(address) => {
                Some(*consts::ARBITRUM_GOERLI_USDC)
            }
            _ => None,
        }
    }

    /// Reads needed to populate everything `resolve` looks at.
    pub fn balance_requests(
        &self,
        token: Option<&TokenSelection>,
        native_currency: &NativeCurrency,
    ) -> Vec<BalanceRequest> {
        let mut parent_assets = vec![Asset::Native];
        let mut child_assets = vec![Asset::Native];

        if let Some(address) = native_currency.parent_address() {
            parent_assets.push(Asset::Erc20(address));
        }

        if let Some(selected) = token {
            match usdc_family(selected.address) {
                Some((origin, native, bridged)) => {
                    parent_assets.push(Asset::Erc20(origin));
                    child_assets.push(Asset::Erc20(native));
                    child_assets.push(Asset::Erc20(bridged));
                }
                None => {
                    parent_assets.push(Asset::Erc20(selected.address));
                    if let Some(l2_address) = selected.l2_address {
                        child_assets.push(Asset::Erc20(l2_address));
                    }
                }
            }
        }

        let mut requests = Vec::with_capacity(2);
        if let Some(holder) = self.parent_holder() {
            requests.push(BalanceRequest {
                chain_id: self.relationship.parent_chain,
                holder,
                assets: parent_assets,
            });
        }
        if let Some(holder) = self.child_holder() {
            requests.push(BalanceRequest {
                chain_id: self.relationship.child_chain,
                holder,
                assets: child_assets,
            });
        }
        requests
    }
}

/// (parent USDC, child native USDC, child USDC.e) for any USDC variant.
fn usdc_family(address: Address) -> Option<(Address, Address, Address)> {
    if token::is_token_ethereum_usdc(address) || token::is_token_arbitrum_one_native_usdc(address) {
        Some((
            *consts::ETHEREUM_USDC,
            *consts::ARBITRUM_ONE_USDC,
            *consts::ARBITRUM_ONE_USDC_E,
        ))
    } else if token::is_token_goerli_usdc(address)
        || token::is_token_arbitrum_goerli_native_usdc(address)
    {
        Some((
            *consts::GOERLI_USDC,
            *consts::ARBITRUM_GOERLI_USDC,
            *consts::ARBITRUM_GOERLI_USDC_E,
        ))
    } else {
        None
    }
}
