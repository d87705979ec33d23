use std::sync::Arc;

use ethers::types::Address;
use log::{debug, info, warn};

use super::chain_filter::{ChainPairFilter, NetworkListboxes, SelectionOutcome};
use super::selection::{
    NetworkSelection, NetworksRelationship, SelectorRole, TransferDirection, WalletKind,
};
use crate::balance::{
    BalanceRequest, BalanceResolver, BalanceSnapshot, HolderAddresses, ResolvedBalances,
};
use crate::gas::{GasPrices, MaxAmount, MaxAmountOutcome, MaxAmountRequest, PendingMaxAmount};
use crate::networks::{ChainId, NetworkCatalog};
use crate::prelude::Result;
use crate::readiness::{
    ReadinessInput, TransferPolicy, TransferReadiness, TransferReadinessEvaluator,
};
use crate::token::{self, NativeCurrency, TokenSelection};
use crate::Error;

/// Everything an asynchronous estimate depends on. A result is only applied
/// while the panel still reports the same fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionFingerprint {
    pub selection: NetworkSelection,
    pub token: Option<Address>,
    pub native_currency: Option<Address>,
    pub holders: HolderAddresses,
}

/// State behind the transfer panel: the chain pair, wallet, token and amount.
#[derive(Debug, Clone)]
pub struct TransferPanel {
    catalog: Arc<NetworkCatalog>,
    selection: NetworkSelection,
    wallet_kind: WalletKind,
    testnet_mode: bool,
    holders: HolderAddresses,
    token: Option<TokenSelection>,
    amount: String,
    gas_estimation_failed: bool,
    invalid_destination: bool,
    one_nova_destination: Option<ChainId>,
}

impl TransferPanel {
    pub fn new(
        catalog: Arc<NetworkCatalog>,
        selection: NetworkSelection,
        testnet_mode: bool,
    ) -> Result<Self> {
        selection.relationship(&catalog)?;
        Ok(TransferPanel {
            catalog,
            selection,
            wallet_kind: WalletKind::Loading,
            testnet_mode,
            holders: HolderAddresses::default(),
            token: None,
            amount: String::new(),
            gas_estimation_failed: false,
            invalid_destination: false,
            one_nova_destination: None,
        })
    }

    pub fn catalog(&self) -> &NetworkCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> NetworkSelection {
        self.selection
    }

    pub fn relationship(&self) -> Result<NetworksRelationship> {
        self.selection.relationship(&self.catalog)
    }

    pub fn direction(&self) -> Result<TransferDirection> {
        Ok(self.relationship()?.direction)
    }

    pub fn token(&self) -> Option<&TokenSelection> {
        self.token.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn holders(&self) -> HolderAddresses {
        self.holders
    }

    pub fn gas_estimation_failed(&self) -> bool {
        self.gas_estimation_failed
    }

    /// Gas asset of the child chain of the current pair.
    pub fn native_currency(&self) -> Result<NativeCurrency> {
        let relationship = self.relationship()?;
        Ok(NativeCurrency::for_chain(
            self.catalog.get(relationship.child_chain)?,
        ))
    }

    pub fn set_wallet(&mut self, wallet: Option<Address>, wallet_kind: WalletKind) {
        self.holders.wallet = wallet;
        self.wallet_kind = wallet_kind;
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
    }

    /// Custom destination addresses are only allowed for token transfers.
    /// Returns whether the address was accepted.
    pub fn set_destination_address(&mut self, destination: Option<Address>) -> bool {
        if destination.is_some() && self.token.is_none() {
            warn!("Ignoring destination address without a selected token");
            self.holders.destination = None;
            return false;
        }
        self.holders.destination = destination;
        self.invalid_destination = false;
        true
    }

    /// Raw text from the destination address field. Empty text clears the
    /// destination; text that does not parse keeps it cleared and is reported
    /// by `readiness`.
    pub fn enter_destination_address(&mut self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() {
            return self.set_destination_address(None);
        }
        match input.parse::<Address>() {
            Ok(address) => self.set_destination_address(Some(address)),
            Err(_) => {
                debug!("Destination {input:?} is not an address");
                self.holders.destination = None;
                self.invalid_destination = self.token.is_some();
                false
            }
        }
    }

    pub fn set_token(&mut self, token: Option<TokenSelection>) -> Result<()> {
        self.token = token;
        if self.token.is_none() {
            self.holders.destination = None;
            self.invalid_destination = false;
        }
        self.gas_estimation_failed = false;
        self.retarget_token()
    }

    fn retarget_token(&mut self) -> Result<()> {
        if !self.direction()?.is_deposit() {
            return Ok(());
        }
        if let Some(retargeted) = self.token.as_ref().and_then(token::retarget_for_deposit) {
            info!(
                "Retargeting native USDC selection to parent-chain USDC {:?}",
                retargeted.address
            );
            self.token = Some(retargeted);
        }
        Ok(())
    }

    fn filter(&self) -> ChainPairFilter<'_> {
        ChainPairFilter::new(&self.catalog, self.wallet_kind, self.testnet_mode)
    }

    pub fn listboxes(&self) -> Result<NetworkListboxes<'_>> {
        self.filter().listboxes(&self.selection)
    }

    pub fn select_network(&mut self, role: SelectorRole, chain_id: ChainId) -> Result<SelectionOutcome> {
        let outcome = self.filter().select(role, chain_id, &self.selection)?;
        match outcome {
            SelectionOutcome::Apply(next) | SelectionOutcome::Swap(next) => {
                self.apply_selection(next)?;
            }
            SelectionOutcome::OneNovaTransfer {
                destination_chain_id,
            } => {
                self.one_nova_destination = Some(destination_chain_id);
            }
        }
        Ok(outcome)
    }

    /// The swap button; contract wallets and undetected wallets cannot swap.
    pub fn swap_networks(&mut self) -> Result<bool> {
        if self.wallet_kind != WalletKind::ExternallyOwned {
            debug!("Swap ignored for wallet kind {:?}", self.wallet_kind);
            return Ok(false);
        }
        self.apply_selection(self.selection.swapped())?;
        Ok(true)
    }

    /// Destination of a pending One-Nova transfer, cleared once read.
    pub fn take_one_nova_transfer(&mut self) -> Option<ChainId> {
        self.one_nova_destination.take()
    }

    fn apply_selection(&mut self, next: NetworkSelection) -> Result<()> {
        let previous_parent = self.relationship()?.parent_chain;
        let relationship = next.relationship(&self.catalog)?;
        self.selection = next;
        self.gas_estimation_failed = false;

        // token addresses are parent-chain addresses
        if relationship.parent_chain != previous_parent && self.token.take().is_some() {
            info!("Cleared token selection after moving to parent chain {}", relationship.parent_chain);
            self.holders.destination = None;
        }
        self.retarget_token()
    }

    pub fn fingerprint(&self) -> Result<SelectionFingerprint> {
        Ok(SelectionFingerprint {
            selection: self.selection,
            token: self.token.as_ref().map(|token| token.address),
            native_currency: self.native_currency()?.parent_address(),
            holders: self.holders,
        })
    }

    pub fn balance_resolver(&self) -> Result<BalanceResolver> {
        Ok(BalanceResolver::new(self.relationship()?, self.holders))
    }

    pub fn balance_requests(&self) -> Result<Vec<BalanceRequest>> {
        Ok(self
            .balance_resolver()?
            .balance_requests(self.token.as_ref(), &self.native_currency()?))
    }

    pub fn resolve_balances(&self, snapshot: &BalanceSnapshot) -> Result<ResolvedBalances> {
        Ok(self
            .balance_resolver()?
            .resolve(self.token.as_ref(), &self.native_currency()?, snapshot))
    }

    /// Captures what the max-amount estimator needs, tagged with the current fingerprint.
    pub fn max_amount_request(
        &self,
        snapshot: &BalanceSnapshot,
        gas_prices: GasPrices,
    ) -> Result<MaxAmountRequest> {
        let relationship = self.relationship()?;
        Ok(MaxAmountRequest {
            fingerprint: self.fingerprint()?,
            direction: relationship.direction,
            parent_chain: relationship.parent_chain,
            child_chain: relationship.child_chain,
            token: self.token.clone(),
            native_currency: self.native_currency()?,
            balances: self.resolve_balances(snapshot)?,
            wallet: self.holders.wallet,
            gas_prices,
        })
    }

    /// Applies an estimate if the selection has not moved on since it was requested.
    pub fn apply_max_amount(&mut self, pending: &PendingMaxAmount) -> Result<Option<MaxAmount>> {
        if pending.fingerprint != self.fingerprint()? {
            warn!("Discarding max amount computed for a previous selection");
            return Err(Error::StaleEstimate);
        }
        match &pending.outcome {
            MaxAmountOutcome::Ready(max_amount) => {
                self.amount = max_amount.to_string();
                self.gas_estimation_failed = false;
                Ok(Some(*max_amount))
            }
            MaxAmountOutcome::BalanceUnknown => Ok(None),
            MaxAmountOutcome::EstimationFailed(reason) => {
                debug!("Max amount unavailable: {reason}");
                self.gas_estimation_failed = true;
                Ok(None)
            }
        }
    }

    pub fn readiness(
        &self,
        snapshot: &BalanceSnapshot,
        policy: &TransferPolicy,
        estimated_fees: Option<f64>,
    ) -> Result<TransferReadiness> {
        if !self.selection.is_valid(&self.catalog) {
            return Ok(TransferReadiness::default());
        }
        let native_currency = self.native_currency()?;
        let balances = self.resolve_balances(snapshot)?;
        let input = ReadinessInput {
            direction: balances.direction,
            amount: &self.amount,
            token: self.token.as_ref(),
            native_currency: &native_currency,
            balances: &balances,
            gas_estimation_failed: self.gas_estimation_failed,
            invalid_destination: self.invalid_destination,
            estimated_fees,
        };
        Ok(TransferReadinessEvaluator::new(policy).evaluate(&input))
    }
}
