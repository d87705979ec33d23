mod row;
mod withdrawals;

pub use row::{
    relative_time, AssetType, DepositStatus, MergedTransaction, StatusLabel, WithdrawalStatus,
};
pub use withdrawals::{
    fetch_token_withdrawals_from_event_logs, BlockRange, WithdrawalEvent, WithdrawalEventSource,
};
