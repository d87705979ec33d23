use super::{Chain, ChainCategory};
use crate::consts;

/// Styling key for a chain, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeTag {
    XaiTestnet,
    StylusTestnet,
    Orbit,
    Ethereum,
    ArbitrumNova,
    ArbitrumOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainTheme {
    /// Background token for the source chain selector button
    pub selector_class: &'static str,
    /// Background token for the custom destination banner; empty for Orbit
    /// chains, which are tinted with their own brand colour instead
    pub banner_class: &'static str,
}

impl ThemeTag {
    pub fn for_chain(chain: &Chain) -> Self {
        match chain.id {
            consts::XAI_TESTNET => return ThemeTag::XaiTestnet,
            consts::STYLUS_TESTNET => return ThemeTag::StylusTestnet,
            _ => {}
        }
        match chain.category {
            ChainCategory::Orbit => ThemeTag::Orbit,
            ChainCategory::Ethereum => ThemeTag::Ethereum,
            ChainCategory::ArbitrumNova => ThemeTag::ArbitrumNova,
            ChainCategory::Arbitrum => ThemeTag::ArbitrumOne,
        }
    }

    pub fn theme(self) -> ChainTheme {
        let (selector_class, banner_class) = match self {
            ThemeTag::XaiTestnet => ("bg-xai-primary", ""),
            ThemeTag::StylusTestnet => ("bg-stylus-primary", ""),
            ThemeTag::Orbit => ("bg-orbit-primary", ""),
            ThemeTag::Ethereum => ("bg-eth-primary", "bg-cyan"),
            ThemeTag::ArbitrumNova => ("bg-arb-nova-primary", "bg-orange"),
            ThemeTag::ArbitrumOne => ("bg-arb-one-primary", "bg-cyan"),
        };
        ChainTheme {
            selector_class,
            banner_class,
        }
    }
}

pub fn theme_for_chain(chain: &Chain) -> ChainTheme {
    ThemeTag::for_chain(chain).theme()
}
