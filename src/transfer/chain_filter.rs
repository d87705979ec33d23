use log::{debug, info};

use super::selection::{NetworkSelection, SelectorRole, WalletKind};
use crate::consts;
use crate::networks::{Chain, ChainId, NetworkCatalog};
use crate::prelude::Result;
use crate::Error;

/// Result of the user picking a chain in one of the selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Use this pair
    Apply(NetworkSelection),
    /// The user picked the chain on the other side; source and destination trade places
    Swap(NetworkSelection),
    /// One and Nova are siblings, the transfer has to go through the dedicated
    /// One-Nova flow instead of being paired directly
    OneNovaTransfer { destination_chain_id: ChainId },
}

impl SelectionOutcome {
    /// The pair to apply, if the outcome is a plain selection change.
    pub fn selection(&self) -> Option<NetworkSelection> {
        match self {
            SelectionOutcome::Apply(selection) | SelectionOutcome::Swap(selection) => {
                Some(*selection)
            }
            SelectionOutcome::OneNovaTransfer { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListboxState<'a> {
    pub value: ChainId,
    pub options: Vec<&'a Chain>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkListboxes<'a> {
    pub from: ListboxState<'a>,
    pub to: ListboxState<'a>,
}

pub fn is_one_nova_pair(a: ChainId, b: ChainId) -> bool {
    matches!(
        (a, b),
        (consts::ARBITRUM_ONE, consts::ARBITRUM_NOVA) | (consts::ARBITRUM_NOVA, consts::ARBITRUM_ONE)
    )
}

/// Builds the candidate lists for the "from" and "to" network selectors.
#[derive(Debug, Clone, Copy)]
pub struct ChainPairFilter<'a> {
    catalog: &'a NetworkCatalog,
    wallet_kind: WalletKind,
    testnet_mode: bool,
}

impl<'a> ChainPairFilter<'a> {
    pub fn new(catalog: &'a NetworkCatalog, wallet_kind: WalletKind, testnet_mode: bool) -> Self {
        ChainPairFilter {
            catalog,
            wallet_kind,
            testnet_mode,
        }
    }

    pub fn candidates(
        &self,
        role: SelectorRole,
        selection: &NetworkSelection,
    ) -> Result<Vec<&'a Chain>> {
        let source = self.catalog.get(selection.source)?;
        let destination = self.catalog.get(selection.destination)?;

        let base: Vec<&'a Chain> = match role {
            SelectorRole::From => self.catalog.supported_networks(self.testnet_mode),
            SelectorRole::To => {
                let relationship = selection.relationship(self.catalog)?;
                let mut options = vec![self.catalog.get(relationship.parent_chain)?];
                options.extend(self.catalog.children_of(relationship.parent_chain));
                options
            }
        };

        Ok(base
            .into_iter()
            .filter(|option| self.is_candidate(role, option, source, destination))
            .collect())
    }

    fn is_candidate(
        &self,
        role: SelectorRole,
        option: &Chain,
        source: &Chain,
        destination: &Chain,
    ) -> bool {
        let is_source_list = role == SelectorRole::From;
        let is_destination_list = role == SelectorRole::To;
        let is_same_as_source = option.id == source.id;
        let is_same_as_destination = option.id == destination.id;
        let selected = if is_source_list { source } else { destination };

        // contract wallets cannot leave the source network
        if self.wallet_kind == WalletKind::SmartContract
            && is_destination_list
            && is_same_as_source
        {
            return false;
        }

        if option.is_orbit_chain() && is_source_list && destination.is_arbitrum_nova() {
            return false;
        }
        if option.is_orbit_chain() && is_destination_list && source.is_arbitrum_nova() {
            return false;
        }

        if selected.is_arbitrum() && option.is_orbit_chain() {
            if is_source_list && !is_same_as_destination {
                return false;
            }
            if is_destination_list && !is_same_as_source {
                return false;
            }
        }

        if source.is_orbit_chain() && is_destination_list {
            if option.is_ethereum_mainnet_or_testnet() {
                return false;
            }
            if option.is_orbit_chain() && !is_same_as_source {
                return false;
            }
        }

        if destination.is_orbit_chain() && is_source_list {
            if option.is_ethereum_mainnet_or_testnet() {
                return false;
            }
            if option.is_orbit_chain() && !is_same_as_destination {
                return false;
            }
        }

        option.id != selected.id
    }

    pub fn listboxes(&self, selection: &NetworkSelection) -> Result<NetworkListboxes<'a>> {
        let from_options = self.candidates(SelectorRole::From, selection)?;
        let to_options = self.candidates(SelectorRole::To, selection)?;

        let from_disabled =
            from_options.is_empty() || self.wallet_kind != WalletKind::ExternallyOwned;
        let to_disabled = to_options.is_empty();
        if from_disabled || to_disabled {
            debug!(
                "Selectors disabled for {} -> {}: from={} to={}",
                selection.source, selection.destination, from_disabled, to_disabled
            );
        }

        Ok(NetworkListboxes {
            from: ListboxState {
                value: selection.source,
                options: from_options,
                disabled: from_disabled,
            },
            to: ListboxState {
                value: selection.destination,
                options: to_options,
                disabled: to_disabled,
            },
        })
    }

    pub fn select(
        &self,
        role: SelectorRole,
        chain_id: ChainId,
        selection: &NetworkSelection,
    ) -> Result<SelectionOutcome> {
        self.catalog.get(chain_id)?;

        if role == SelectorRole::From && self.wallet_kind != WalletKind::ExternallyOwned {
            debug!("From selector ignored for wallet kind {:?}", self.wallet_kind);
            return Err(Error::SelectorDisabled);
        }
        if !self
            .candidates(role, selection)?
            .iter()
            .any(|option| option.id == chain_id)
        {
            debug!("Chain {} is not a {:?} candidate", chain_id, role);
            return Err(Error::ChainNotSelectable(chain_id));
        }

        let (other_side, destination_if_one_nova) = match role {
            SelectorRole::From => (selection.destination, selection.destination),
            SelectorRole::To => (selection.source, chain_id),
        };

        if is_one_nova_pair(chain_id, other_side) {
            info!(
                "One-Nova transfer requested, destination {}",
                destination_if_one_nova
            );
            return Ok(SelectionOutcome::OneNovaTransfer {
                destination_chain_id: destination_if_one_nova,
            });
        }

        if chain_id == other_side {
            debug!("Swapping {} and {}", selection.source, selection.destination);
            return Ok(SelectionOutcome::Swap(selection.swapped()));
        }

        let next = match role {
            SelectorRole::From => selection.with_source(self.catalog, chain_id)?,
            SelectorRole::To => selection.with_destination(self.catalog, chain_id)?,
        };
        debug!("Selection changed to {} -> {}", next.source, next.destination);
        Ok(SelectionOutcome::Apply(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn ids(chains: &[&Chain]) -> Vec<ChainId> {
        chains.iter().map(|chain| chain.id).collect()
    }

    #[test]
    fn test_deposit_to_list_offers_siblings() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, false);
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_ONE);

        let to = filter.candidates(SelectorRole::To, &selection).unwrap();
        assert_eq!(ids(&to), vec![ETHEREUM, ARBITRUM_NOVA]);
    }

    #[test]
    fn test_contract_wallet_cannot_target_source() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::SmartContract, false);
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_ONE);

        let to = filter.candidates(SelectorRole::To, &selection).unwrap();
        assert!(!ids(&to).contains(&ETHEREUM));

        let listboxes = filter.listboxes(&selection).unwrap();
        assert!(listboxes.from.disabled);
        assert!(!listboxes.to.disabled);
    }

    #[test]
    fn test_from_selector_disabled_while_wallet_loading() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::Loading, false);
        let listboxes = filter
            .listboxes(&NetworkSelection::new(ETHEREUM, ARBITRUM_ONE))
            .unwrap();
        assert!(listboxes.from.disabled);
    }

    #[test]
    fn test_orbit_source_only_reaches_its_parent() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, true);
        let selection = NetworkSelection::new(XAI, ARBITRUM_ONE);

        let to = filter.candidates(SelectorRole::To, &selection).unwrap();
        let to_ids = ids(&to);
        assert!(to_ids.contains(&XAI));
        assert!(to.iter().all(|chain| !chain.is_ethereum_mainnet_or_testnet()));
        assert!(to
            .iter()
            .all(|chain| !chain.is_orbit_chain() || chain.id == XAI));
    }

    #[test]
    fn test_orbit_destination_limits_source_list() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, true);
        let selection = NetworkSelection::new(ARBITRUM_ONE, XAI);

        let from = filter.candidates(SelectorRole::From, &selection).unwrap();
        assert!(from.iter().all(|chain| !chain.is_ethereum_mainnet_or_testnet()));
        assert!(from
            .iter()
            .all(|chain| !chain.is_orbit_chain() || chain.id == XAI));
        assert!(!ids(&from).contains(&ARBITRUM_ONE));
    }

    #[test]
    fn test_nova_hides_orbit_chains() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, true);
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_NOVA);

        let from = filter.candidates(SelectorRole::From, &selection).unwrap();
        assert!(from.iter().all(|chain| !chain.is_orbit_chain()));
    }

    #[test]
    fn test_base_chain_hides_unrelated_orbit_chains() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, true);
        let selection = NetworkSelection::new(ARBITRUM_SEPOLIA, SEPOLIA);

        let from = filter.candidates(SelectorRole::From, &selection).unwrap();
        assert!(from.iter().all(|chain| !chain.is_orbit_chain()));
    }

    #[test]
    fn test_testnets_hidden_outside_testnet_mode() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, false);
        let from = filter
            .candidates(SelectorRole::From, &NetworkSelection::new(ETHEREUM, ARBITRUM_ONE))
            .unwrap();
        assert!(from.iter().all(|chain| !chain.is_testnet));
        assert!(!ids(&from).contains(&ETHEREUM));
    }

    #[test]
    fn test_one_nova_pair_is_signalled() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, false);

        let from_nova = filter
            .select(
                SelectorRole::From,
                ARBITRUM_NOVA,
                &NetworkSelection::new(ETHEREUM, ARBITRUM_ONE),
            )
            .unwrap();
        assert_eq!(
            from_nova,
            SelectionOutcome::OneNovaTransfer {
                destination_chain_id: ARBITRUM_ONE
            }
        );

        let to_one = filter
            .select(
                SelectorRole::To,
                ARBITRUM_ONE,
                &NetworkSelection::new(ARBITRUM_NOVA, ETHEREUM),
            )
            .unwrap();
        assert_eq!(
            to_one,
            SelectionOutcome::OneNovaTransfer {
                destination_chain_id: ARBITRUM_ONE
            }
        );
        assert!(to_one.selection().is_none());
    }

    #[test]
    fn test_picking_other_side_swaps() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, false);
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_ONE);

        let outcome = filter.select(SelectorRole::To, ETHEREUM, &selection).unwrap();
        assert_eq!(
            outcome,
            SelectionOutcome::Swap(NetworkSelection::new(ARBITRUM_ONE, ETHEREUM))
        );
    }

    #[test]
    fn test_contract_wallet_cannot_pick_source_as_destination() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::SmartContract, false);
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_ONE);

        assert_eq!(
            filter.select(SelectorRole::To, ETHEREUM, &selection),
            Err(Error::ChainNotSelectable(ETHEREUM))
        );
        assert_eq!(
            filter.select(SelectorRole::To, ARBITRUM_NOVA, &selection),
            Ok(SelectionOutcome::Apply(NetworkSelection::new(ETHEREUM, ARBITRUM_NOVA)))
        );
    }

    #[test]
    fn test_orbit_source_cannot_pick_ethereum() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, false);
        let selection = NetworkSelection::new(XAI, ARBITRUM_ONE);

        assert_eq!(
            filter.select(SelectorRole::To, ETHEREUM, &selection),
            Err(Error::ChainNotSelectable(ETHEREUM))
        );
    }

    #[test]
    fn test_from_selector_rejected_unless_externally_owned() {
        let catalog = NetworkCatalog::builtin();
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_ONE);

        for wallet_kind in [WalletKind::Loading, WalletKind::SmartContract] {
            let filter = ChainPairFilter::new(&catalog, wallet_kind, false);
            assert_eq!(
                filter.select(SelectorRole::From, ARBITRUM_NOVA, &selection),
                Err(Error::SelectorDisabled)
            );
        }
    }

    #[test]
    fn test_select_rederives_pair() {
        let catalog = NetworkCatalog::builtin();
        let filter = ChainPairFilter::new(&catalog, WalletKind::ExternallyOwned, false);
        let selection = NetworkSelection::new(ETHEREUM, ARBITRUM_ONE);

        let outcome = filter.select(SelectorRole::To, ARBITRUM_NOVA, &selection).unwrap();
        assert_eq!(
            outcome,
            SelectionOutcome::Apply(NetworkSelection::new(ETHEREUM, ARBITRUM_NOVA))
        );
    }
}
