use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use ethers::types::{Address, U256};
use ethers::utils::parse_units;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::balance::{Balance, ResolvedBalances};
use crate::consts;
use crate::gas::{format_decimal, parse_decimal_f64};
use crate::prelude::Result;
use crate::token::{NativeCurrency, TokenSelection};
use crate::transfer::TransferDirection;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RichErrorKind {
    GasEstimationFailure,
    TokenWithdrawOnly,
    TokenTransferDisabled,
}

impl RichErrorKind {
    pub fn explanation(self) -> String {
        match self {
            RichErrorKind::GasEstimationFailure => format!(
                "Gas estimation failed, join our Discord ({}) and reach out in #support for assistance.",
                consts::SUPPORT_DISCORD_URL
            ),
            RichErrorKind::TokenWithdrawOnly | RichErrorKind::TokenTransferDisabled => {
                "This token can't be bridged over.".to_string()
            }
        }
    }

    /// Estimation failures clear up by estimating again; policy blocks do not.
    pub fn is_retryable(self) -> bool {
        self == RichErrorKind::GasEstimationFailure
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessMessage {
    Rich(RichErrorKind),
    Text(String),
}

impl fmt::Display for ReadinessMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessMessage::Rich(kind) => write!(f, "{}", kind.explanation()),
            ReadinessMessage::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferReadiness {
    pub is_ready: bool,
    pub message: Option<ReadinessMessage>,
}

impl TransferReadiness {
    fn ready() -> Self {
        TransferReadiness {
            is_ready: true,
            message: None,
        }
    }

    /// Not ready, nothing to tell the user (empty amount, balances loading).
    fn waiting() -> Self {
        TransferReadiness::default()
    }

    fn blocked(message: ReadinessMessage) -> Self {
        TransferReadiness {
            is_ready: false,
            message: Some(message),
        }
    }
}

/// Tokens the bridge refuses to move, keyed by parent-chain address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPolicy {
    #[serde(default)]
    pub disabled_tokens: HashSet<Address>,
    #[serde(default)]
    pub withdraw_only_tokens: HashSet<Address>,
}

impl TransferPolicy {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::JsonParse(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::Io(e.to_string()))?;
        Self::from_json(&json)
    }

    pub fn is_transfer_disabled(&self, token: Address) -> bool {
        self.disabled_tokens.contains(&token)
    }

    pub fn is_withdraw_only(&self, token: Address) -> bool {
        self.withdraw_only_tokens.contains(&token)
    }
}

/// Parses a user-typed decimal amount. Fraction digits beyond `decimals` are dropped.
pub fn parse_amount(amount: &str, decimals: u32) -> Result<U256> {
    let trimmed = amount.trim();
    let invalid = || Error::InvalidAmount(amount.to_string());

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let is_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(invalid());
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = &fraction[..fraction.len().min(decimals as usize)];
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    parse_units(normalized, decimals)
        .map(U256::from)
        .map_err(|_| invalid())
}

pub struct ReadinessInput<'a> {
    pub direction: TransferDirection,
    pub amount: &'a str,
    pub token: Option<&'a TokenSelection>,
    pub native_currency: &'a NativeCurrency,
    pub balances: &'a ResolvedBalances,
    pub gas_estimation_failed: bool,
    /// The custom destination field holds text that is not an address
    pub invalid_destination: bool,
    /// Estimated fees in ether, when an estimate for the current amount exists
    pub estimated_fees: Option<f64>,
}

/// Decides whether the transfer button can be enabled and what to tell the user.
///
/// Performs no retries; callers re-run estimation and evaluate again.
pub struct TransferReadinessEvaluator<'a> {
    policy: &'a TransferPolicy,
}

impl<'a> TransferReadinessEvaluator<'a> {
    pub fn new(policy: &'a TransferPolicy) -> Self {
        TransferReadinessEvaluator { policy }
    }

    pub fn evaluate(&self, input: &ReadinessInput<'_>) -> TransferReadiness {
        if let Some(token) = input.token {
            if self.policy.is_transfer_disabled(token.address) {
                return TransferReadiness::blocked(ReadinessMessage::Rich(
                    RichErrorKind::TokenTransferDisabled,
                ));
            }
            if input.direction.is_deposit() && self.policy.is_withdraw_only(token.address) {
                return TransferReadiness::blocked(ReadinessMessage::Rich(
                    RichErrorKind::TokenWithdrawOnly,
                ));
            }
        }

        if input.gas_estimation_failed {
            return TransferReadiness::blocked(ReadinessMessage::Rich(
                RichErrorKind::GasEstimationFailure,
            ));
        }

        if input.invalid_destination {
            return TransferReadiness::blocked(ReadinessMessage::Text(
                "The destination address is not a valid address.".to_string(),
            ));
        }

        if input.amount.trim().is_empty() {
            return TransferReadiness::waiting();
        }

        let (decimals, symbol) = match input.token {
            Some(token) => (token.decimals, token.symbol.as_str()),
            None => (input.native_currency.decimals(), input.native_currency.symbol()),
        };

        let amount = match parse_amount(input.amount, decimals) {
            Ok(amount) => amount,
            Err(_) => {
                return TransferReadiness::blocked(ReadinessMessage::Text(
                    "Please enter a valid amount.".to_string(),
                ))
            }
        };
        if amount.is_zero() {
            return TransferReadiness::waiting();
        }

        let Balance::Known(balance) = input.balances.source_balance() else {
            debug!("Source balance still loading");
            return TransferReadiness::waiting();
        };
        if amount > balance {
            return TransferReadiness::blocked(ReadinessMessage::Text(format!(
                "Insufficient balance, please add more {symbol} to your wallet."
            )));
        }

        let Some(fees) = input.estimated_fees else {
            return TransferReadiness::ready();
        };

        let pays_gas_in_transferred_asset = input.token.is_none()
            && !(input.native_currency.is_custom() && input.direction.is_deposit());

        let (gas_balance, gas_symbol) = if pays_gas_in_transferred_asset {
            (Balance::Known(balance), input.native_currency.symbol())
        } else {
            self.gas_balance(input)
        };
        let Balance::Known(gas_balance) = gas_balance else {
            return TransferReadiness::waiting();
        };

        let gas_decimals = if input.direction.is_deposit() && !pays_gas_in_transferred_asset {
            consts::ETHER_DECIMALS
        } else {
            input.native_currency.decimals()
        };
        let spent = if pays_gas_in_transferred_asset {
            to_f64(amount, decimals)
        } else {
            Ok(0.0)
        };
        let (available, spent) = match (to_f64(gas_balance, gas_decimals), spent) {
            (Ok(available), Ok(spent)) => (available, spent),
            (Err(err), _) | (_, Err(err)) => {
                warn!("Skipping gas check: {err}");
                return TransferReadiness::waiting();
            }
        };

        if spent + fees > available {
            return TransferReadiness::blocked(ReadinessMessage::Text(format!(
                "Insufficient {gas_symbol} to pay for gas fees."
            )));
        }

        TransferReadiness::ready()
    }

    /// Balance paying for gas when it differs from the transferred asset: ETH on
    /// the parent chain for deposits, the child's native currency for withdrawals.
    fn gas_balance<'b>(&self, input: &'b ReadinessInput<'_>) -> (Balance, &'b str) {
        match input.direction {
            TransferDirection::Deposit => (
                input
                    .balances
                    .parent
                    .eth
                    .unwrap_or(input.balances.parent.native_currency),
                "ETH",
            ),
            TransferDirection::Withdrawal => (
                input.balances.child.native_currency,
                input.native_currency.symbol(),
            ),
        }
    }
}

fn to_f64(amount: U256, decimals: u32) -> Result<f64> {
    parse_decimal_f64(&format_decimal(amount, decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::ChainBalances;
    use crate::consts::{ARBITRUM_ONE, ETHEREUM};

    fn eth(value: u64, fraction_digits: u32) -> U256 {
        U256::from(value) * U256::exp10(18 - fraction_digits as usize)
    }

    fn balances(direction: TransferDirection, parent_native: Balance, child_native: Balance) -> ResolvedBalances {
        ResolvedBalances {
            direction,
            parent: ChainBalances {
                chain_id: ETHEREUM,
                token: None,
                native_currency: parent_native,
                eth: None,
                native_usdc: None,
            },
            child: ChainBalances {
                chain_id: ARBITRUM_ONE,
                token: None,
                native_currency: child_native,
                eth: None,
                native_usdc: None,
            },
        }
    }

    fn input<'a>(
        amount: &'a str,
        balances: &'a ResolvedBalances,
        native: &'a NativeCurrency,
    ) -> ReadinessInput<'a> {
        ReadinessInput {
            direction: balances.direction,
            amount,
            token: None,
            native_currency: native,
            balances,
            gas_estimation_failed: false,
            invalid_destination: false,
            estimated_fees: None,
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5", 6).unwrap(), U256::from(1_500_000));
        assert_eq!(parse_amount(".5", 1).unwrap(), U256::from(5));
        assert_eq!(parse_amount("0.1234567", 6).unwrap(), U256::from(123_456));
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount(".", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
    }

    #[test]
    fn test_ready_when_balance_covers_amount() {
        let native = NativeCurrency::Eth;
        let resolved = balances(
            TransferDirection::Deposit,
            Balance::Known(eth(1, 0)),
            Balance::Unknown,
        );
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default())
            .evaluate(&input("0.5", &resolved, &native));
        assert!(readiness.is_ready);
        assert!(readiness.message.is_none());
    }

    #[test]
    fn test_unknown_balance_is_loading_not_error() {
        let native = NativeCurrency::Eth;
        let resolved = balances(TransferDirection::Deposit, Balance::Unknown, Balance::Unknown);
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default())
            .evaluate(&input("0.5", &resolved, &native));
        assert_eq!(readiness, TransferReadiness::default());
    }

    #[test]
    fn test_insufficient_balance() {
        let native = NativeCurrency::Eth;
        let resolved = balances(
            TransferDirection::Deposit,
            Balance::Known(eth(1, 0)),
            Balance::Unknown,
        );
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default())
            .evaluate(&input("2", &resolved, &native));
        assert!(!readiness.is_ready);
        assert!(matches!(readiness.message, Some(ReadinessMessage::Text(_))));
    }

    #[test]
    fn test_insufficient_for_gas() {
        let native = NativeCurrency::Eth;
        let resolved = balances(
            TransferDirection::Withdrawal,
            Balance::Unknown,
            Balance::Known(eth(1, 0)),
        );
        let mut request = input("1", &resolved, &native);
        request.estimated_fees = Some(0.05);
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default()).evaluate(&request);
        assert_eq!(
            readiness.message,
            Some(ReadinessMessage::Text(
                "Insufficient ETH to pay for gas fees.".to_string()
            ))
        );

        request.amount = "0.93";
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default()).evaluate(&request);
        assert!(readiness.is_ready);
    }

    #[test]
    fn test_invalid_destination_blocks_transfer() {
        let native = NativeCurrency::Eth;
        let resolved = balances(TransferDirection::Deposit, Balance::Known(eth(1, 0)), Balance::Unknown);
        let mut request = input("0.5", &resolved, &native);
        request.invalid_destination = true;
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default()).evaluate(&request);
        assert!(!readiness.is_ready);
        assert!(matches!(readiness.message, Some(ReadinessMessage::Text(_))));
    }

    #[test]
    fn test_gas_estimation_failure_is_retryable() {
        let native = NativeCurrency::Eth;
        let resolved = balances(TransferDirection::Deposit, Balance::Unknown, Balance::Unknown);
        let mut request = input("", &resolved, &native);
        request.gas_estimation_failed = true;
        let readiness = TransferReadinessEvaluator::new(&TransferPolicy::default()).evaluate(&request);
        assert_eq!(
            readiness.message,
            Some(ReadinessMessage::Rich(RichErrorKind::GasEstimationFailure))
        );
        assert!(RichErrorKind::GasEstimationFailure.is_retryable());
        assert!(readiness.message.unwrap().to_string().contains("#support"));
    }

    #[test]
    fn test_policy_blocks_tokens() {
        let blocked = Address::repeat_byte(0x33);
        let withdraw_only = Address::repeat_byte(0x44);
        let policy = TransferPolicy::from_json(&format!(
            r#"{{"disabledTokens": ["{blocked:?}"], "withdrawOnlyTokens": ["{withdraw_only:?}"]}}"#
        ))
        .unwrap();
        let evaluator = TransferReadinessEvaluator::new(&policy);
        let native = NativeCurrency::Eth;
        let resolved = balances(TransferDirection::Deposit, Balance::Unknown, Balance::Unknown);

        let token = TokenSelection::new("BAD", 18, blocked, None);
        let mut request = input("1", &resolved, &native);
        request.token = Some(&token);
        assert_eq!(
            evaluator.evaluate(&request).message,
            Some(ReadinessMessage::Rich(RichErrorKind::TokenTransferDisabled))
        );

        let token = TokenSelection::new("OUT", 18, withdraw_only, None);
        request.token = Some(&token);
        let readiness = evaluator.evaluate(&request);
        assert_eq!(
            readiness.message,
            Some(ReadinessMessage::Rich(RichErrorKind::TokenWithdrawOnly))
        );
        assert!(!RichErrorKind::TokenWithdrawOnly.is_retryable());

        let withdrawal = balances(TransferDirection::Withdrawal, Balance::Unknown, Balance::Unknown);
        request.balances = &withdrawal;
        request.direction = TransferDirection::Withdrawal;
        assert!(evaluator.evaluate(&request).message.is_none());
    }
}
