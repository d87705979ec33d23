use std::fmt;

use chrono::{DateTime, Utc};
use ethers::types::Address;
use serde::{Deserialize, Serialize};

use crate::consts::HIGHLIGHT_WINDOW_SECS;
use crate::networks::{ChainId, NetworkCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStatus {
    L1Pending,
    L1Failure,
    L2Pending,
    L2Success,
    L2Failure,
    CreationFailed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawalStatus {
    Unconfirmed,
    Confirmed,
    Executed,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
    Eth,
    Erc20,
}

/// A deposit or withdrawal as listed in the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedTransaction {
    pub tx_id: String,
    pub sender: Address,
    pub asset: String,
    pub asset_type: AssetType,
    pub value: String,
    #[serde(default)]
    pub token_address: Option<Address>,
    pub parent_chain_id: ChainId,
    pub child_chain_id: ChainId,
    pub is_withdrawal: bool,
    #[serde(default)]
    pub is_cctp: bool,
    #[serde(default)]
    pub deposit_status: Option<DepositStatus>,
    #[serde(default)]
    pub withdrawal_status: Option<WithdrawalStatus>,
    /// Hash of the transaction that completed the transfer on the destination chain
    #[serde(default)]
    pub destination_tx_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    Failed,
    Expired,
    Pending,
    Claimable,
    Success,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusLabel::Failed => "Failed",
            StatusLabel::Expired => "Expired",
            StatusLabel::Pending => "Pending",
            StatusLabel::Claimable => "Claimable",
            StatusLabel::Success => "Success",
        };
        write!(f, "{label}")
    }
}

impl MergedTransaction {
    fn is_deposit_like(&self) -> bool {
        self.is_cctp || !self.is_withdrawal
    }

    pub fn source_chain_id(&self) -> ChainId {
        if self.is_withdrawal {
            self.child_chain_id
        } else {
            self.parent_chain_id
        }
    }

    pub fn destination_chain_id(&self) -> ChainId {
        if self.is_withdrawal {
            self.parent_chain_id
        } else {
            self.child_chain_id
        }
    }

    /// Withdrawals and CCTP transfers need a claim on the destination chain.
    pub fn is_claimable_kind(&self) -> bool {
        self.is_cctp || self.is_withdrawal
    }

    pub fn is_failed(&self) -> bool {
        if self.is_deposit_like() {
            return matches!(
                self.deposit_status,
                Some(DepositStatus::L1Failure | DepositStatus::L2Failure | DepositStatus::CreationFailed)
            );
        }
        self.withdrawal_status == Some(WithdrawalStatus::Failure)
    }

    pub fn is_expired(&self) -> bool {
        self.is_deposit_like() && self.deposit_status == Some(DepositStatus::Expired)
    }

    pub fn is_pending(&self) -> bool {
        if self.is_deposit_like() {
            return matches!(
                self.deposit_status,
                None | Some(DepositStatus::L1Pending | DepositStatus::L2Pending)
            );
        }
        matches!(self.withdrawal_status, None | Some(WithdrawalStatus::Unconfirmed))
    }

    pub fn is_claimable(&self) -> bool {
        self.is_claimable_kind() && self.withdrawal_status == Some(WithdrawalStatus::Confirmed)
    }

    pub fn status_label(&self) -> StatusLabel {
        if self.is_failed() {
            StatusLabel::Failed
        } else if self.is_expired() {
            StatusLabel::Expired
        } else if self.is_pending() {
            StatusLabel::Pending
        } else if self.is_claimable() {
            StatusLabel::Claimable
        } else {
            StatusLabel::Success
        }
    }

    /// Rendered as an error row. A failed retryable creation only counts for
    /// ETH deposits.
    pub fn is_error(&self) -> bool {
        if self.is_deposit_like() {
            match self.deposit_status {
                Some(DepositStatus::L1Failure | DepositStatus::Expired) => return true,
                Some(DepositStatus::CreationFailed) => return self.asset_type == AssetType::Eth,
                _ => {}
            }
        }
        self.withdrawal_status == Some(WithdrawalStatus::Failure)
    }

    pub fn should_highlight(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_seconds() <= HIGHLIGHT_WINDOW_SECS
    }

    /// Explorer link for the status label: the source transaction unless the
    /// transfer completed, then the destination transaction if known.
    pub fn status_link(&self, catalog: &NetworkCatalog) -> Option<String> {
        let (chain_id, tx_id) = match self.status_label() {
            StatusLabel::Success => (self.destination_chain_id(), self.destination_tx_id.as_deref()?),
            _ => (self.source_chain_id(), self.tx_id.as_str()),
        };
        Some(format!("{}/tx/{}", catalog.explorer_url(chain_id)?, tx_id))
    }

    pub fn sender_link(&self, catalog: &NetworkCatalog) -> Option<String> {
        Some(format!(
            "{}/address/{:?}",
            catalog.explorer_url(self.source_chain_id())?,
            self.sender
        ))
    }

    pub fn token_link(&self, catalog: &NetworkCatalog) -> Option<String> {
        Some(format!(
            "{}/token/{:?}",
            catalog.explorer_url(self.source_chain_id())?,
            self.token_address?
        ))
    }
}

/// Relative age such as "a few seconds ago" or "3 hours ago". Re-derived on a
/// timer by the caller, so it depends only on its arguments.
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    match (seconds, minutes, hours, days) {
        (0..=44, _, _, _) => "a few seconds ago".to_string(),
        (45..=89, _, _, _) => "a minute ago".to_string(),
        (_, 0..=44, _, _) => format!("{} minutes ago", ((seconds + 30) / 60).max(2)),
        (_, 45..=89, _, _) => "an hour ago".to_string(),
        (_, _, 0..=21, _) => format!("{} hours ago", ((minutes + 30) / 60).max(2)),
        (_, _, 22..=35, _) => "a day ago".to_string(),
        (_, _, _, 0..=25) => format!("{} days ago", ((hours + 12) / 24).max(2)),
        (_, _, _, 26..=45) => "a month ago".to_string(),
        (_, _, _, 46..=319) => format!("{} months ago", ((days + 15) / 30).max(2)),
        (_, _, _, 320..=547) => "a year ago".to_string(),
        _ => format!("{} years ago", ((days + 182) / 365).max(2)),
    }
}
