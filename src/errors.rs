use crate::networks::ChainId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown chain id: {0}")]
    UnknownChain(ChainId),
    #[error("Chains {0} and {1} are not a parent/child pair")]
    UnrelatedChains(ChainId, ChainId),
    #[error("Chain {0} is not offered by this selector")]
    ChainNotSelectable(ChainId),
    #[error("Source network selector is disabled for this wallet")]
    SelectorDisabled,
    #[error("Invalid chain catalog: {0}")]
    InvalidCatalog(String),
    #[error("Json parse error {0:?}")]
    JsonParse(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Io error: {0}")]
    Io(String),
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),
    #[error("Balance fetch failed: {0}")]
    BalanceFetch(String),
    #[error("Event log query failed: {0}")]
    EventLogQuery(String),
    #[error("Invalid amount {0:?}")]
    InvalidAmount(String),
    #[error("Estimate no longer matches the current selection")]
    StaleEstimate,
}
