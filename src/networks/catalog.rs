use std::collections::HashMap;
use std::path::Path;

use ethers::types::Address;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::prelude::Result;
use crate::Error;

pub type ChainId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChainCategory {
    /// Root chain, Ethereum mainnet or one of its testnets
    Ethereum,
    /// Arbitrum chain settling to Ethereum (One, Goerli, Sepolia, local)
    Arbitrum,
    ArbitrumNova,
    /// Chain whose parent is an Arbitrum chain
    Orbit,
}

/// Gas-paying ERC-20 of a chain whose native currency is not ETH.
///
/// `address` is the token's address on the parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomNativeCurrency {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: ChainId,
    pub name: String,
    #[serde(default)]
    pub parent_chain_id: Option<ChainId>,
    pub category: ChainCategory,
    #[serde(default)]
    pub is_testnet: bool,
    #[serde(default)]
    pub explorer_url: String,
    #[serde(default)]
    pub native_currency: Option<CustomNativeCurrency>,
}

impl Chain {
    pub fn is_ethereum_mainnet_or_testnet(&self) -> bool {
        self.category == ChainCategory::Ethereum
    }

    /// True for every Arbitrum chain settling to Ethereum, Nova included.
    pub fn is_arbitrum(&self) -> bool {
        matches!(
            self.category,
            ChainCategory::Arbitrum | ChainCategory::ArbitrumNova
        )
    }

    pub fn is_arbitrum_nova(&self) -> bool {
        self.category == ChainCategory::ArbitrumNova
    }

    pub fn is_orbit_chain(&self) -> bool {
        self.category == ChainCategory::Orbit
    }

    pub fn is_arbitrum_one(&self) -> bool {
        self.id == consts::ARBITRUM_ONE
    }

    pub fn has_custom_native_currency(&self) -> bool {
        self.native_currency.is_some()
    }
}

/// Read-only registry of the chains the bridge knows about.
///
/// Chain order is preserved and drives the order of selector candidates.
#[derive(Debug, Clone)]
pub struct NetworkCatalog {
    chains: Vec<Chain>,
    index: HashMap<ChainId, usize>,
}

impl NetworkCatalog {
    pub fn from_chains(chains: Vec<Chain>) -> Result<Self> {
        let mut index = HashMap::with_capacity(chains.len());
        for (position, chain) in chains.iter().enumerate() {
            if index.insert(chain.id, position).is_some() {
                return Err(Error::InvalidCatalog(format!(
                    "duplicate chain id {}",
                    chain.id
                )));
            }
        }

        let catalog = NetworkCatalog { chains, index };
        catalog.validate()?;
        debug!("Loaded network catalog with {} chains", catalog.chains.len());
        Ok(catalog)
    }

    pub fn builtin() -> Self {
        let chains = builtin_chains();
        let index = chains
            .iter()
            .enumerate()
            .map(|(position, chain)| (chain.id, position))
            .collect();
        NetworkCatalog { chains, index }
    }

    /// Built-in chains plus the Orbit chains described by `json` (an array of chains).
    pub fn with_custom_chains(json: &str) -> Result<Self> {
        let custom: Vec<Chain> =
            serde_json::from_str(json).map_err(|e| Error::JsonParse(e.to_string()))?;
        info!("Registering {} custom chains", custom.len());
        let mut chains = builtin_chains();
        chains.extend(custom);
        Self::from_chains(chains)
    }

    pub fn with_custom_chains_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
        Self::with_custom_chains(&json)
    }

    fn validate(&self) -> Result<()> {
        for chain in &self.chains {
            match (chain.category, chain.parent_chain_id) {
                (ChainCategory::Ethereum, None) => {}
                (ChainCategory::Ethereum, Some(_)) => {
                    return Err(Error::InvalidCatalog(format!(
                        "root chain {} cannot have a parent",
                        chain.id
                    )))
                }
                (_, None) => {
                    return Err(Error::InvalidCatalog(format!(
                        "chain {} is missing its parent",
                        chain.id
                    )))
                }
                (category, Some(parent_id)) => {
                    let parent = self.find(parent_id).ok_or_else(|| {
                        Error::InvalidCatalog(format!(
                            "chain {} has unknown parent {}",
                            chain.id, parent_id
                        ))
                    })?;
                    let parent_ok = match category {
                        ChainCategory::Orbit => parent.is_arbitrum(),
                        _ => parent.is_ethereum_mainnet_or_testnet(),
                    };
                    if !parent_ok {
                        return Err(Error::InvalidCatalog(format!(
                            "chain {} cannot settle to {}",
                            chain.id, parent_id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn find(&self, id: ChainId) -> Option<&Chain> {
        self.index.get(&id).map(|&position| &self.chains[position])
    }

    pub fn get(&self, id: ChainId) -> Result<&Chain> {
        self.find(id).ok_or(Error::UnknownChain(id))
    }

    pub fn parent_of(&self, id: ChainId) -> Option<&Chain> {
        self.find(id)
            .and_then(|chain| chain.parent_chain_id)
            .and_then(|parent_id| self.find(parent_id))
    }

    pub fn children_of(&self, parent_id: ChainId) -> Vec<&Chain> {
        self.chains
            .iter()
            .filter(|chain| chain.parent_chain_id == Some(parent_id))
            .collect()
    }

    /// Whether `ancestor` sits anywhere above `descendant` in the settlement tree.
    pub fn is_ancestor(&self, ancestor: ChainId, descendant: ChainId) -> bool {
        let mut current = self.parent_of(descendant);
        while let Some(chain) = current {
            if chain.id == ancestor {
                return true;
            }
            current = self.parent_of(chain.id);
        }
        false
    }

    pub fn is_parent_chain(&self, id: ChainId) -> bool {
        self.chains
            .iter()
            .any(|chain| chain.parent_chain_id == Some(id))
    }

    pub fn supported_networks(&self, testnet_mode: bool) -> Vec<&Chain> {
        self.chains
            .iter()
            .filter(|chain| testnet_mode || !chain.is_testnet)
            .collect()
    }

    pub fn network_name(&self, id: ChainId) -> String {
        self.find(id)
            .map(|chain| chain.name.clone())
            .unwrap_or_else(|| format!("Chain {id}"))
    }

    pub fn explorer_url(&self, id: ChainId) -> Option<&str> {
        self.find(id)
            .map(|chain| chain.explorer_url.as_str())
            .filter(|url| !url.is_empty())
    }
}

impl Default for NetworkCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn chain(
    id: ChainId,
    name: &str,
    parent_chain_id: Option<ChainId>,
    category: ChainCategory,
    is_testnet: bool,
    explorer_url: &str,
) -> Chain {
    Chain {
        id,
        name: name.to_string(),
        parent_chain_id,
        category,
        is_testnet,
        explorer_url: explorer_url.to_string(),
        native_currency: None,
    }
}

fn builtin_chains() -> Vec<Chain> {
    use ChainCategory::*;

    let mut xai = chain(
        consts::XAI,
        "Xai",
        Some(consts::ARBITRUM_ONE),
        Orbit,
        false,
        "https://explorer.xai-chain.net",
    );
    xai.native_currency = Some(CustomNativeCurrency {
        address: *consts::XAI_TOKEN_ARBITRUM_ONE,
        name: "Xai".to_string(),
        symbol: "XAI".to_string(),
        decimals: 18,
    });

    vec![
        chain(consts::ETHEREUM, "Ethereum", None, Ethereum, false, "https://etherscan.io"),
        chain(
            consts::ARBITRUM_ONE,
            "Arbitrum One",
            Some(consts::ETHEREUM),
            Arbitrum,
            false,
            "https://arbiscan.io",
        ),
        chain(
            consts::ARBITRUM_NOVA,
            "Arbitrum Nova",
            Some(consts::ETHEREUM),
            ArbitrumNova,
            false,
            "https://nova.arbiscan.io",
        ),
        xai,
        chain(consts::GOERLI, "Goerli", None, Ethereum, true, "https://goerli.etherscan.io"),
        chain(
            consts::ARBITRUM_GOERLI,
            "Arbitrum Goerli",
            Some(consts::GOERLI),
            Arbitrum,
            true,
            "https://goerli.arbiscan.io",
        ),
        chain(
            consts::XAI_TESTNET,
            "Xai Orbit Testnet",
            Some(consts::ARBITRUM_GOERLI),
            Orbit,
            true,
            "https://testnet-explorer.xai-chain.net",
        ),
        chain(consts::SEPOLIA, "Sepolia", None, Ethereum, true, "https://sepolia.etherscan.io"),
        chain(
            consts::ARBITRUM_SEPOLIA,
            "Arbitrum Sepolia",
            Some(consts::SEPOLIA),
            Arbitrum,
            true,
            "https://sepolia-explorer.arbitrum.io",
        ),
        chain(
            consts::STYLUS_TESTNET,
            "Stylus Testnet",
            Some(consts::ARBITRUM_SEPOLIA),
            Orbit,
            true,
            "https://stylus-testnet-explorer.arbitrum.io",
        ),
        chain(consts::LOCAL, "Ethereum Local", None, Ethereum, true, ""),
        chain(
            consts::ARBITRUM_LOCAL,
            "Arbitrum Local",
            Some(consts::LOCAL),
            Arbitrum,
            true,
            "",
        ),
    ]
}
