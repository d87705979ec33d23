use std::collections::HashSet;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use futures_util::future::try_join_all;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::prelude::Result;

/// A token withdrawal initiated through a child-chain gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalEvent {
    pub tx_hash: H256,
    pub l1_token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub block_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// Inclusive
    pub from_block: u64,
    /// Inclusive
    pub to_block: u64,
}

/// Child-chain log reader. `from` and `to` narrow the query to withdrawals
/// sent by, or received by, an address.
#[async_trait]
pub trait WithdrawalEventSource: Send + Sync {
    async fn withdrawal_events(
        &self,
        gateway: Address,
        range: BlockRange,
        from: Option<Address>,
        to: Option<Address>,
    ) -> Result<Vec<WithdrawalEvent>>;
}

/// Token withdrawals in `range` that `address` sent or received, across all
/// `gateways`. A withdrawal to oneself shows up in both queries and is kept once.
pub async fn fetch_token_withdrawals_from_event_logs<S>(
    source: &S,
    address: Address,
    range: BlockRange,
    gateways: &[Address],
) -> Result<Vec<WithdrawalEvent>>
where
    S: WithdrawalEventSource + ?Sized,
{
    let queries = gateways.iter().flat_map(|&gateway| {
        [
            source.withdrawal_events(gateway, range, Some(address), None),
            source.withdrawal_events(gateway, range, None, Some(address)),
        ]
    });

    let events: Vec<WithdrawalEvent> = try_join_all(queries).await?.into_iter().flatten().collect();
    let total = events.len();

    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<WithdrawalEvent> = events
        .into_iter()
        .filter(|event| seen.insert(event.tx_hash))
        .collect();

    debug!(
        "Fetched {} token withdrawals for {:?} ({} duplicates)",
        unique.len(),
        address,
        total - unique.len()
    );
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct MemorySource {
        events: Vec<(Address, WithdrawalEvent)>,
    }

    #[async_trait]
    impl WithdrawalEventSource for MemorySource {
        async fn withdrawal_events(
            &self,
            gateway: Address,
            range: BlockRange,
            from: Option<Address>,
            to: Option<Address>,
        ) -> Result<Vec<WithdrawalEvent>> {
            if gateway == Address::zero() {
                return Err(Error::EventLogQuery("gateway not deployed".to_string()));
            }
            Ok(self
                .events
                .iter()
                .filter(|(event_gateway, event)| {
                    *event_gateway == gateway
                        && event.block_number >= range.from_block
                        && event.block_number <= range.to_block
                        && from.map_or(true, |from| event.from == from)
                        && to.map_or(true, |to| event.to == to)
                })
                .map(|(_, event)| event.clone())
                .collect())
        }
    }

    fn event(hash: u8, from: Address, to: Address, block_number: u64) -> WithdrawalEvent {
        WithdrawalEvent {
            tx_hash: H256::repeat_byte(hash),
            l1_token: Address::repeat_byte(0xee),
            from,
            to,
            amount: U256::from(hash),
            block_number,
        }
    }

    #[tokio::test]
    async fn test_self_withdrawals_are_deduplicated() {
        let me = Address::repeat_byte(1);
        let other = Address::repeat_byte(2);
        let gateway = Address::repeat_byte(0x10);
        let source = MemorySource {
            events: vec![
                (gateway, event(1, me, me, 10)),
                (gateway, event(2, me, other, 11)),
                (gateway, event(3, other, me, 12)),
                (gateway, event(4, other, other, 13)),
                (gateway, event(5, me, me, 99)),
            ],
        };

        let range = BlockRange {
            from_block: 10,
            to_block: 13,
        };
        let events = fetch_token_withdrawals_from_event_logs(&source, me, range, &[gateway])
            .await
            .unwrap();

        let hashes: Vec<H256> = events.iter().map(|event| event.tx_hash).collect();
        assert_eq!(
            hashes,
            vec![H256::repeat_byte(1), H256::repeat_byte(2), H256::repeat_byte(3)]
        );
    }

    #[tokio::test]
    async fn test_no_gateways_means_no_queries() {
        let source = MemorySource { events: vec![] };
        let range = BlockRange {
            from_block: 0,
            to_block: 1,
        };
        let events =
            fetch_token_withdrawals_from_event_logs(&source, Address::repeat_byte(1), range, &[])
                .await
                .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_propagates() {
        let source = MemorySource { events: vec![] };
        let range = BlockRange {
            from_block: 0,
            to_block: 1,
        };
        let result = fetch_token_withdrawals_from_event_logs(
            &source,
            Address::repeat_byte(1),
            range,
            &[Address::zero()],
        )
        .await;
        assert!(matches!(result, Err(Error::EventLogQuery(_))));
    }
}
