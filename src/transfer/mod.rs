mod chain_filter;
mod panel;
mod selection;

pub use chain_filter::{
    is_one_nova_pair, ChainPairFilter, ListboxState, NetworkListboxes, SelectionOutcome,
};
pub use panel::{SelectionFingerprint, TransferPanel};
pub use selection::{
    NetworkSelection, NetworksRelationship, SelectorRole, TransferDirection, WalletKind,
};
