mod fees;
mod max_amount;

pub use fees::{
    calculate_estimated_l1_gas_fees, calculate_estimated_l2_gas_fees, estimate_gas,
    total_gas_fees, GasEstimateRequest, GasEstimates, GasEstimator, GasPrices,
};
pub use max_amount::{
    fee_adjusted_max, format_decimal, MaxAmount, MaxAmountEstimator, MaxAmountOutcome,
    MaxAmountRequest, PendingMaxAmount,
};
pub(crate) use fees::parse_decimal_f64;
