use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::networks::{Chain, CustomNativeCurrency};

/// ERC-20 picked in the transfer panel.
///
/// `address` is always the parent-chain address; `l2_address` is the child-chain
/// counterpart when the token has been deployed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSelection {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub address: Address,
    #[serde(default)]
    pub l2_address: Option<Address>,
}

impl TokenSelection {
    pub fn new(symbol: &str, decimals: u32, address: Address, l2_address: Option<Address>) -> Self {
        TokenSelection {
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            decimals,
            address,
            l2_address,
        }
    }

    fn usdc(address: Address, l2_address: Address) -> Self {
        TokenSelection {
            name: "USD Coin".to_string(),
            symbol: "USDC".to_string(),
            decimals: consts::USDC_DECIMALS,
            address,
            l2_address: Some(l2_address),
        }
    }

    pub fn is_native_usdc_on_child(&self) -> bool {
        native_usdc_origin(self.address).is_some()
    }
}

/// Gas-paying asset of the child chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NativeCurrency {
    #[default]
    Eth,
    Custom(CustomNativeCurrency),
}

impl NativeCurrency {
    pub fn for_chain(chain: &Chain) -> Self {
        match &chain.native_currency {
            Some(custom) => NativeCurrency::Custom(custom.clone()),
            None => NativeCurrency::Eth,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, NativeCurrency::Custom(_))
    }

    pub fn decimals(&self) -> u32 {
        match self {
            NativeCurrency::Eth => consts::ETHER_DECIMALS,
            NativeCurrency::Custom(custom) => custom.decimals,
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            NativeCurrency::Eth => "ETH",
            NativeCurrency::Custom(custom) => &custom.symbol,
        }
    }

    /// Parent-chain ERC-20 address of a custom native currency.
    pub fn parent_address(&self) -> Option<Address> {
        match self {
            NativeCurrency::Eth => None,
            NativeCurrency::Custom(custom) => Some(custom.address),
        }
    }
}

pub fn is_token_ethereum_usdc(address: Address) -> bool {
    address == *consts::ETHEREUM_USDC
}

pub fn is_token_goerli_usdc(address: Address) -> bool {
    address == *consts::GOERLI_USDC
}

pub fn is_token_arbitrum_one_native_usdc(address: Address) -> bool {
    address == *consts::ARBITRUM_ONE_USDC
}

pub fn is_token_arbitrum_goerli_native_usdc(address: Address) -> bool {
    address == *consts::ARBITRUM_GOERLI_USDC
}

/// USDC on a parent chain or native USDC on a child chain.
pub fn is_token_usdc(address: Address) -> bool {
    is_token_ethereum_usdc(address)
        || is_token_goerli_usdc(address)
        || is_token_arbitrum_one_native_usdc(address)
        || is_token_arbitrum_goerli_native_usdc(address)
}

/// Parent-chain USDC that native USDC on a child chain is bridged against.
pub fn native_usdc_origin(address: Address) -> Option<Address> {
    if is_token_arbitrum_one_native_usdc(address) {
        Some(*consts::ETHEREUM_USDC)
    } else if is_token_arbitrum_goerli_native_usdc(address) {
        Some(*consts::GOERLI_USDC)
    } else {
        None
    }
}

/// Native USDC on the child chain has no parent-chain deposit route; deposits
/// use the parent-chain USDC bridged to `USDC.e`.
pub fn retarget_for_deposit(token: &TokenSelection) -> Option<TokenSelection> {
    if is_token_arbitrum_one_native_usdc(token.address) {
        Some(TokenSelection::usdc(
            *consts::ETHEREUM_USDC,
            *consts::ARBITRUM_ONE_USDC_E,
        ))
    } else if is_token_arbitrum_goerli_native_usdc(token.address) {
        Some(TokenSelection::usdc(
            *consts::GOERLI_USDC,
            *consts::ARBITRUM_GOERLI_USDC_E,
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::NetworkCatalog;

    #[test]
    fn test_native_usdc_retargets_to_parent_usdc() {
        let native = TokenSelection::new("USDC", 6, *consts::ARBITRUM_ONE_USDC, None);
        let retargeted = retarget_for_deposit(&native).unwrap();
        assert_eq!(retargeted.address, *consts::ETHEREUM_USDC);
        assert_eq!(retargeted.l2_address, Some(*consts::ARBITRUM_ONE_USDC_E));
        assert_eq!(retargeted.decimals, 6);
    }

    #[test]
    fn test_bridged_tokens_are_not_retargeted() {
        let token = TokenSelection::new("USDC", 6, *consts::ETHEREUM_USDC, None);
        assert!(retarget_for_deposit(&token).is_none());
        assert!(is_token_usdc(token.address));
        assert!(!token.is_native_usdc_on_child());
    }

    #[test]
    fn test_native_currency_from_chain() {
        let catalog = NetworkCatalog::builtin();
        let xai = NativeCurrency::for_chain(catalog.get(consts::XAI).unwrap());
        assert!(xai.is_custom());
        assert_eq!(xai.symbol(), "XAI");
        assert_eq!(xai.parent_address(), Some(*consts::XAI_TOKEN_ARBITRUM_ONE));

        let one = NativeCurrency::for_chain(catalog.get(consts::ARBITRUM_ONE).unwrap());
        assert_eq!(one, NativeCurrency::Eth);
        assert_eq!(one.decimals(), 18);
    }
}
