use std::sync::Arc;

use arb_bridge_core::consts::{ARBITRUM_ONE, ETHEREUM, XAI, XAI_TOKEN_ARBITRUM_ONE};
use arb_bridge_core::gas::{GasEstimateRequest, GasEstimates, GasPrices};
use arb_bridge_core::networks::theme_for_chain;
use arb_bridge_core::{
    Asset, BalanceFetcher, BalanceRequest, BalanceSnapshot, BridgeConfig, GasEstimator,
    MaxAmountEstimator, NetworkSelection, SelectorRole, TransferPanel, WalletKind,
};
use async_trait::async_trait;
use ethers::types::{Address, U256};
use log::info;

/// Pretends every holder owns 2 ETH and 25 XAI everywhere.
struct StaticBalances;

#[async_trait]
impl BalanceFetcher for StaticBalances {
    async fn fetch(
        &self,
        request: &BalanceRequest,
    ) -> arb_bridge_core::prelude::Result<Vec<(Asset, U256)>> {
        Ok(request
            .assets
            .iter()
            .map(|asset| {
                let amount = match asset {
                    Asset::Native => U256::exp10(18) * U256::from(2u64),
                    Asset::Erc20(_) => U256::exp10(18) * U256::from(25u64),
                };
                (*asset, amount)
            })
            .collect())
    }
}

/// 200k units on both chains.
struct FlatGas;

#[async_trait]
impl GasEstimator for FlatGas {
    async fn estimate(
        &self,
        request: &GasEstimateRequest,
    ) -> arb_bridge_core::prelude::Result<GasEstimates> {
        info!(
            "Estimating gas for {} wei from {:?}",
            request.amount, request.address
        );
        Ok(GasEstimates {
            estimated_l1_gas: U256::from(200_000u64),
            estimated_l2_gas: U256::from(200_000u64),
            estimated_l2_submission_cost: U256::exp10(14),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    // 1. Load config and the chain catalog
    let config = BridgeConfig::from_env()?;
    let catalog = Arc::new(config.load_catalog()?);
    let policy = config.load_policy()?;

    // 2. Open the panel on Ethereum -> Arbitrum One with a connected wallet
    let wallet: Address = "0x1111111111111111111111111111111111111111".parse()?;
    let mut panel = TransferPanel::new(
        catalog.clone(),
        NetworkSelection::new(ETHEREUM, ARBITRUM_ONE),
        config.testnet_mode,
    )?;
    panel.set_wallet(Some(wallet), WalletKind::ExternallyOwned);

    let listboxes = panel.listboxes()?;
    println!(
        "From options: {:?}",
        listboxes.from.options.iter().map(|c| &c.name).collect::<Vec<_>>()
    );
    println!(
        "To options: {:?}",
        listboxes.to.options.iter().map(|c| &c.name).collect::<Vec<_>>()
    );

    // 3. Fetch balances and compute the max amount
    let mut snapshot = BalanceSnapshot::new();
    let updated = snapshot
        .refresh(&StaticBalances, &panel.balance_requests()?)
        .await;
    println!("Fetched {updated} balances");

    let estimator = MaxAmountEstimator::with_safety_factor(FlatGas, config.gas_safety_factor);
    let gas_prices = GasPrices {
        parent: U256::exp10(9) * U256::from(20u64),
        child: U256::exp10(8),
    };
    let pending = estimator
        .estimate_max(panel.max_amount_request(&snapshot, gas_prices)?)
        .await;
    if let Some(max_amount) = panel.apply_max_amount(&pending)? {
        println!("Max ETH deposit: {max_amount}");
    }
    println!("Readiness: {:?}", panel.readiness(&snapshot, &policy, Some(0.005))?);

    // 4. Move the destination to Xai, whose gas token is bridged from Arbitrum One
    let outcome = panel.select_network(SelectorRole::From, XAI)?;
    println!("Selecting Xai as source: {:?}", outcome);
    panel.swap_networks()?;
    println!("Swapped to {:?}", panel.selection());
    println!("Theme: {:?}", theme_for_chain(catalog.get(XAI)?));

    let mut snapshot = BalanceSnapshot::new();
    snapshot.set(
        ARBITRUM_ONE,
        wallet,
        Asset::Erc20(*XAI_TOKEN_ARBITRUM_ONE),
        U256::exp10(18) * U256::from(10u64),
    );
    let pending = estimator
        .estimate_max(panel.max_amount_request(&snapshot, gas_prices)?)
        .await;
    if let Some(max_amount) = panel.apply_max_amount(&pending)? {
        println!("Max XAI deposit: {max_amount}");
    }

    Ok(())
}
