use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use ethers::types::{Address, U256};
use ethers::utils::format_units;
use log::{debug, error};

use super::fees::{estimate_gas, parse_decimal_f64, total_gas_fees, GasEstimator, GasPrices};
use crate::balance::{Balance, ResolvedBalances};
use crate::consts::GAS_SAFETY_FACTOR;
use crate::networks::ChainId;
use crate::prelude::Result;
use crate::token::{NativeCurrency, TokenSelection};
use crate::transfer::{SelectionFingerprint, TransferDirection};

/// Largest amount the user can send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxAmount {
    /// The whole balance, gas being paid in another asset
    Exact { amount: U256, decimals: u32 },
    /// Balance minus padded gas fees, in display units
    Estimated(f64),
}

impl MaxAmount {
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            MaxAmount::Exact { amount, decimals } => {
                parse_decimal_f64(&format_decimal(*amount, *decimals))
            }
            MaxAmount::Estimated(value) => Ok(*value),
        }
    }
}

impl fmt::Display for MaxAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxAmount::Exact { amount, decimals } => {
                write!(f, "{}", format_decimal(*amount, *decimals))
            }
            MaxAmount::Estimated(value) => write!(f, "{value}"),
        }
    }
}

/// `format_units` without the trailing zeros, keeping one fractional digit.
pub fn format_decimal(amount: U256, decimals: u32) -> String {
    let formatted = match format_units(amount, decimals) {
        Ok(formatted) => formatted,
        Err(_) => return amount.to_string(),
    };
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => formatted,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaxAmountOutcome {
    Ready(MaxAmount),
    /// The balance it depends on has not been fetched yet
    BalanceUnknown,
    /// Gas estimation failed; the user may retry
    EstimationFailed(String),
}

/// Inputs captured from the transfer panel at the moment the user asked for the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxAmountRequest {
    pub fingerprint: SelectionFingerprint,
    pub direction: TransferDirection,
    pub parent_chain: ChainId,
    pub child_chain: ChainId,
    pub token: Option<TokenSelection>,
    pub native_currency: NativeCurrency,
    pub balances: ResolvedBalances,
    pub wallet: Option<Address>,
    pub gas_prices: GasPrices,
}

/// Result tagged with the selection it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMaxAmount {
    pub fingerprint: SelectionFingerprint,
    pub outcome: MaxAmountOutcome,
}

/// Balance minus `fees * safety_factor`, falling back to the whole balance
/// when that is not positive so the downstream gas check reports it.
pub fn fee_adjusted_max(
    balance: U256,
    decimals: u32,
    total_fees: f64,
    safety_factor: f64,
) -> Result<MaxAmount> {
    let balance = parse_decimal_f64(&format_decimal(balance, decimals))?;
    let max_amount = balance - total_fees * safety_factor;
    Ok(MaxAmount::Estimated(if max_amount > 0.0 {
        max_amount
    } else {
        balance
    }))
}

/// Counts one in-flight estimation until dropped.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn start(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(in_flight)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct MaxAmountEstimator<G> {
    gas_estimator: G,
    safety_factor: f64,
    in_flight: AtomicUsize,
}

impl<G: GasEstimator> MaxAmountEstimator<G> {
    pub fn new(gas_estimator: G) -> Self {
        Self::with_safety_factor(gas_estimator, GAS_SAFETY_FACTOR)
    }

    pub fn with_safety_factor(gas_estimator: G, safety_factor: f64) -> Self {
        MaxAmountEstimator {
            gas_estimator,
            safety_factor,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn safety_factor(&self) -> f64 {
        self.safety_factor
    }

    /// True while any gas estimation for the maximum is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn estimate_max(&self, request: MaxAmountRequest) -> PendingMaxAmount {
        let outcome = self.compute(&request).await;
        PendingMaxAmount {
            fingerprint: request.fingerprint,
            outcome,
        }
    }

    async fn compute(&self, request: &MaxAmountRequest) -> MaxAmountOutcome {
        let source = request.balances.source();

        if let Some(token) = &request.token {
            return match source.token.unwrap_or_default() {
                Balance::Known(amount) => MaxAmountOutcome::Ready(MaxAmount::Exact {
                    amount,
                    decimals: token.decimals,
                }),
                Balance::Unknown => MaxAmountOutcome::BalanceUnknown,
            };
        }

        let decimals = request.native_currency.decimals();
        let Balance::Known(balance) = source.native_currency else {
            return MaxAmountOutcome::BalanceUnknown;
        };

        // deposit fees for a custom gas token are paid in the parent chain's ETH
        if request.native_currency.is_custom() && request.direction.is_deposit() {
            return MaxAmountOutcome::Ready(MaxAmount::Exact {
                amount: balance,
                decimals,
            });
        }

        let _loading = LoadingGuard::start(&self.in_flight);
        let estimates = match estimate_gas(
            &self.gas_estimator,
            request.direction,
            balance,
            request.wallet,
            request.parent_chain,
            request.child_chain,
        )
        .await
        {
            Ok(estimates) => estimates,
            Err(err) => {
                error!("Max amount gas estimation failed: {err}");
                return MaxAmountOutcome::EstimationFailed(err.to_string());
            }
        };

        let max_amount = total_gas_fees(request.direction, &estimates, &request.gas_prices)
            .and_then(|total_fees| {
                debug!(
                    "Estimated {} fees of {total_fees} {}",
                    if request.direction.is_deposit() { "deposit" } else { "withdrawal" },
                    request.native_currency.symbol()
                );
                fee_adjusted_max(balance, decimals, total_fees, self.safety_factor)
            });
        match max_amount {
            Ok(max_amount) => MaxAmountOutcome::Ready(max_amount),
            Err(err) => {
                error!("Max amount fee conversion failed: {err}");
                MaxAmountOutcome::EstimationFailed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::{GasEstimateRequest, GasEstimates};
    use crate::Error;
    use async_trait::async_trait;

    #[test]
    fn test_format_decimal_trims_zeros() {
        assert_eq!(format_decimal(U256::exp10(19), 18), "10.0");
        assert_eq!(format_decimal(U256::from(1_500_000), 6), "1.5");
        assert_eq!(format_decimal(U256::zero(), 6), "0.0");
    }

    #[test]
    fn test_fee_adjusted_max_applies_safety_factor() {
        let max = fee_adjusted_max(U256::exp10(18), 18, 0.05, GAS_SAFETY_FACTOR).unwrap();
        assert!((max.as_f64().unwrap() - 0.93).abs() < 1e-9);
    }

    #[test]
    fn test_fee_adjusted_max_never_negative() {
        let balance = U256::exp10(16);
        let max = fee_adjusted_max(balance, 18, 0.05, GAS_SAFETY_FACTOR).unwrap();
        assert_eq!(max, MaxAmount::Estimated(0.01));

        let empty = fee_adjusted_max(U256::zero(), 18, 0.0, GAS_SAFETY_FACTOR).unwrap();
        assert_eq!(empty.as_f64(), Ok(0.0));
    }

    struct FailingEstimator;

    #[async_trait]
    impl GasEstimator for FailingEstimator {
        async fn estimate(&self, _request: &GasEstimateRequest) -> Result<GasEstimates> {
            Err(Error::GasEstimation("execution reverted".to_string()))
        }
    }

    #[test]
    fn test_loading_guard_resets_on_drop() {
        let estimator = MaxAmountEstimator::new(FailingEstimator);
        {
            let _guard = LoadingGuard::start(&estimator.in_flight);
            assert!(estimator.is_loading());
        }
        assert!(!estimator.is_loading());
    }

    #[test]
    fn test_loading_stays_set_until_last_estimate_ends() {
        let estimator = MaxAmountEstimator::new(FailingEstimator);
        let first = LoadingGuard::start(&estimator.in_flight);
        let second = LoadingGuard::start(&estimator.in_flight);

        drop(first);
        assert!(estimator.is_loading());
        drop(second);
        assert!(!estimator.is_loading());
    }
}
