use async_trait::async_trait;
use ethers::types::{Address, U256};
use ethers::utils::format_ether;
use serde::{Deserialize, Serialize};

use crate::networks::ChainId;
use crate::prelude::Result;
use crate::transfer::TransferDirection;
use crate::Error;

/// Gas units for each phase of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimates {
    /// Parent-chain execution, or the batch posting share of a withdrawal
    pub estimated_l1_gas: U256,
    pub estimated_l2_gas: U256,
    /// Retryable submission cost in wei; zero for withdrawals
    pub estimated_l2_submission_cost: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPrices {
    pub parent: U256,
    pub child: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimateRequest {
    pub direction: TransferDirection,
    pub amount: U256,
    pub address: Address,
    pub parent_chain: ChainId,
    pub child_chain: ChainId,
}

/// Chain-reading layer that simulates a native-currency transfer.
#[async_trait]
pub trait GasEstimator: Send + Sync {
    async fn estimate(&self, request: &GasEstimateRequest) -> Result<GasEstimates>;
}

/// Estimates for `amount`, or zeros when no wallet is connected.
pub async fn estimate_gas<G>(
    estimator: &G,
    direction: TransferDirection,
    amount: U256,
    wallet: Option<Address>,
    parent_chain: ChainId,
    child_chain: ChainId,
) -> Result<GasEstimates>
where
    G: GasEstimator + ?Sized,
{
    let Some(address) = wallet else {
        return Ok(GasEstimates::default());
    };

    let request = GasEstimateRequest {
        direction,
        amount,
        address,
        parent_chain,
        child_chain,
    };
    let estimates = estimator.estimate(&request).await?;

    Ok(match direction {
        TransferDirection::Deposit => estimates,
        TransferDirection::Withdrawal => GasEstimates {
            estimated_l2_submission_cost: U256::zero(),
            ..estimates
        },
    })
}

/// Parses a formatted decimal amount. Non-finite values are rejected.
pub(crate) fn parse_decimal_f64(text: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidAmount(text.to_string())),
    }
}

fn wei_to_ether_f64(wei: U256) -> Result<f64> {
    parse_decimal_f64(&format_ether(wei))
}

/// Parent-chain fee in ether.
pub fn calculate_estimated_l1_gas_fees(estimated_l1_gas: U256, gas_price: U256) -> Result<f64> {
    wei_to_ether_f64(estimated_l1_gas.saturating_mul(gas_price))
}

/// Child-chain fee in ether, submission cost included.
pub fn calculate_estimated_l2_gas_fees(
    estimated_l2_gas: U256,
    gas_price: U256,
    estimated_l2_submission_cost: U256,
) -> Result<f64> {
    wei_to_ether_f64(
        estimated_l2_gas
            .saturating_mul(gas_price)
            .saturating_add(estimated_l2_submission_cost),
    )
}

/// Total fee in ether. Withdrawals price the L1 component at the child gas
/// price, since the node interface reports it in child gas units.
pub fn total_gas_fees(
    direction: TransferDirection,
    estimates: &GasEstimates,
    prices: &GasPrices,
) -> Result<f64> {
    let l1_price = match direction {
        TransferDirection::Deposit => prices.parent,
        TransferDirection::Withdrawal => prices.child,
    };
    Ok(calculate_estimated_l1_gas_fees(estimates.estimated_l1_gas, l1_price)?
        + calculate_estimated_l2_gas_fees(
            estimates.estimated_l2_gas,
            prices.child,
            estimates.estimated_l2_submission_cost,
        )?)
}
