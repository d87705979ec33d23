use serde::{Deserialize, Serialize};

use crate::networks::{ChainId, NetworkCatalog};
use crate::prelude::Result;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransferDirection {
    /// Source is an ancestor of the destination
    Deposit,
    /// Destination is an ancestor of the source
    Withdrawal,
}

impl TransferDirection {
    pub fn between(
        catalog: &NetworkCatalog,
        source: ChainId,
        destination: ChainId,
    ) -> Result<Self> {
        catalog.get(source)?;
        catalog.get(destination)?;
        if catalog.is_ancestor(source, destination) {
            Ok(TransferDirection::Deposit)
        } else if catalog.is_ancestor(destination, source) {
            Ok(TransferDirection::Withdrawal)
        } else {
            Err(Error::UnrelatedChains(source, destination))
        }
    }

    pub fn is_deposit(self) -> bool {
        self == TransferDirection::Deposit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorRole {
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WalletKind {
    /// Wallet kind has not been detected yet
    #[default]
    Loading,
    ExternallyOwned,
    /// Contract wallets cannot switch networks on their own
    SmartContract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSelection {
    pub source: ChainId,
    pub destination: ChainId,
}

/// A directly connected parent/child pair and which way funds move across it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworksRelationship {
    pub parent_chain: ChainId,
    pub child_chain: ChainId,
    pub direction: TransferDirection,
}

impl NetworkSelection {
    pub fn new(source: ChainId, destination: ChainId) -> Self {
        NetworkSelection {
            source,
            destination,
        }
    }

    pub fn swapped(self) -> Self {
        NetworkSelection {
            source: self.destination,
            destination: self.source,
        }
    }

    pub fn relationship(&self, catalog: &NetworkCatalog) -> Result<NetworksRelationship> {
        let source = catalog.get(self.source)?;
        let destination = catalog.get(self.destination)?;
        if destination.parent_chain_id == Some(source.id) {
            Ok(NetworksRelationship {
                parent_chain: source.id,
                child_chain: destination.id,
                direction: TransferDirection::Deposit,
            })
        } else if source.parent_chain_id == Some(destination.id) {
            Ok(NetworksRelationship {
                parent_chain: destination.id,
                child_chain: source.id,
                direction: TransferDirection::Withdrawal,
            })
        } else {
            Err(Error::UnrelatedChains(self.source, self.destination))
        }
    }

    pub fn is_valid(&self, catalog: &NetworkCatalog) -> bool {
        self.relationship(catalog).is_ok()
    }

    /// Keeps `source` and re-derives the destination if the pair no longer connects.
    pub fn with_source(self, catalog: &NetworkCatalog, source: ChainId) -> Result<Self> {
        let candidate = NetworkSelection::new(source, self.destination);
        if candidate.is_valid(catalog) {
            return Ok(candidate);
        }
        let destination = default_counterpart(catalog, source)?;
        Ok(NetworkSelection::new(source, destination))
    }

    /// Keeps `destination` and re-derives the source if the pair no longer connects.
    pub fn with_destination(
        self,
        catalog: &NetworkCatalog,
        destination: ChainId,
    ) -> Result<Self> {
        let candidate = NetworkSelection::new(self.source, destination);
        if candidate.is_valid(catalog) {
            return Ok(candidate);
        }
        let source = default_counterpart(catalog, destination)?;
        Ok(NetworkSelection::new(source, destination))
    }
}

/// First child in catalog order, otherwise the parent.
fn default_counterpart(catalog: &NetworkCatalog, id: ChainId) -> Result<ChainId> {
    let chain = catalog.get(id)?;
    if let Some(child) = catalog.children_of(id).first() {
        return Ok(child.id);
    }
    chain
        .parent_chain_id
        .ok_or_else(|| Error::InvalidCatalog(format!("chain {id} has no counterpart")))
}
