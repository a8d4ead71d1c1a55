//! Redeem Delay Queue
//!
//! Pending redemptions bucketed by completion time. Buckets live under
//! fixed-width big-endian keys, so "every bucket due at `now`" is a single
//! ascending range scan and auditing is a single reverse prefix scan.
//!
//! Entry lifecycle: `Pending` (inserted, collateral in the Redeeming pool)
//! -> `Released` (dequeued by the end-of-cycle hook, collateral sent to the
//! owner). Dequeuing removes the bucket, so an entry is released once.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::debug;

use usc_common::errors::{UscError, UscResult};
use usc_common::types::{Address, Coins, Timestamp};

use crate::keys::{parse_redeem_queue_key, redeem_queue_key, REDEEM_QUEUE_PREFIX};
use crate::store::{decode, KvStore, KvStoreExt};

/// A single pending redemption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RedeemEntry {
    /// Collateral receiver
    pub address: Address,
    /// Collateral held in the Redeeming pool for this entry
    pub collateral: Coins,
}

/// Entries sharing a completion time
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RedeemEntries {
    pub entries: Vec<RedeemEntry>,
}

/// Entry together with its completion time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedRedeem {
    pub completion_time: Timestamp,
    pub entry: RedeemEntry,
}

/// Append an entry to the bucket of `completion_time`
pub fn insert<S: KvStore>(store: &mut S, completion_time: Timestamp, entry: RedeemEntry) -> UscResult<()> {
    let key = redeem_queue_key(completion_time);
    let mut bucket: RedeemEntries = store.get_decoded(&key)?.unwrap_or_default();
    bucket.entries.push(entry);

    debug!(completion_time, bucket_len = bucket.entries.len(), "redeem entry queued");
    store.set_encoded(&key, &bucket)
}

/// Remove and return every entry with completion time `<= now`
///
/// Ascending completion time, then insertion order.
pub fn dequeue_mature<S: KvStore>(store: &mut S, now: Timestamp) -> UscResult<Vec<QueuedRedeem>> {
    let buckets = store.range(&redeem_queue_key(0), &redeem_queue_key(now))?;

    let mut released = Vec::new();
    for (key, value) in buckets {
        let completion_time = parse_redeem_queue_key(&key)?;
        let bucket: RedeemEntries = decode(&value)?;
        store.delete(&key)?;

        debug!(completion_time, entries = bucket.entries.len(), "redeem bucket dequeued");
        released.extend(bucket.entries.into_iter().map(|entry| QueuedRedeem {
            completion_time,
            entry,
        }));
    }

    Ok(released)
}

/// Visit entries from the latest completion time to the earliest
///
/// The visitor returns `true` to stop the whole traversal. Entries inside a
/// bucket are visited in insertion order.
pub fn iterate_descending<S, F>(store: &S, mut visit: F) -> UscResult<()>
where
    S: KvStore,
    F: FnMut(Timestamp, &RedeemEntry) -> bool,
{
    for (key, value) in store.prefix_reverse(&[REDEEM_QUEUE_PREFIX])? {
        let completion_time = parse_redeem_queue_key(&key)?;
        let bucket: RedeemEntries = decode(&value)?;
        for entry in &bucket.entries {
            if visit(completion_time, entry) {
                return Ok(());
            }
        }
    }
    Ok(())
}

/// All pending entries, ascending by completion time
pub fn all_entries<S: KvStore>(store: &S) -> UscResult<Vec<QueuedRedeem>> {
    let buckets = store.range(&redeem_queue_key(0), &redeem_queue_key(Timestamp::MAX))?;

    let mut entries = Vec::new();
    for (key, value) in buckets {
        let completion_time = parse_redeem_queue_key(&key)?;
        let bucket: RedeemEntries = decode(&value)?;
        entries.extend(bucket.entries.into_iter().map(|entry| QueuedRedeem {
            completion_time,
            entry,
        }));
    }
    Ok(entries)
}

/// Number of pending entries owned by `address`
pub fn pending_count<S: KvStore>(store: &S, address: &Address) -> UscResult<u32> {
    let mut count: u32 = 0;
    let mut overflow = false;
    iterate_descending(store, |_, entry| {
        if entry.address == *address {
            match count.checked_add(1) {
                Some(next) => count = next,
                None => overflow = true,
            }
        }
        overflow
    })?;

    if overflow {
        return Err(UscError::Overflow);
    }
    Ok(count)
}

/// Sum of collateral across every pending entry
pub fn total_collateral<S: KvStore>(store: &S) -> UscResult<Coins> {
    let mut total = Coins::new();
    let mut failure = None;
    iterate_descending(store, |_, entry| match total.checked_add(&entry.collateral) {
        Ok(sum) => {
            total = sum;
            false
        }
        Err(e) => {
            failure = Some(e);
            true
        }
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use proptest::prelude::*;
    use usc_common::types::Coin;

    fn entry(owner: u8, amount: u128) -> RedeemEntry {
        RedeemEntry {
            address: [owner; 32],
            collateral: Coins::single(Coin::new("musdc", amount)),
        }
    }

    #[test]
    fn test_matures_at_completion_time() {
        let mut store = MemStore::new();
        // Inserted at t=100 with a 10s delay
        insert(&mut store, 110, entry(1, 5)).unwrap();

        assert!(dequeue_mature(&mut store, 109).unwrap().is_empty());

        let released = dequeue_mature(&mut store, 110).unwrap();
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].completion_time, 110);
        assert_eq!(released[0].entry, entry(1, 5));

        assert!(dequeue_mature(&mut store, 1_000).unwrap().is_empty());
    }

    #[test]
    fn test_dequeue_order() {
        let mut store = MemStore::new();
        insert(&mut store, 20, entry(3, 1)).unwrap();
        insert(&mut store, 10, entry(1, 1)).unwrap();
        insert(&mut store, 10, entry(2, 1)).unwrap();
        insert(&mut store, 30, entry(4, 1)).unwrap();

        let released = dequeue_mature(&mut store, 25).unwrap();
        let owners: Vec<u8> = released.iter().map(|r| r.entry.address[0]).collect();
        assert_eq!(owners, vec![1, 2, 3]);

        // Bucket at 30 untouched
        assert_eq!(all_entries(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_iterate_descending_and_stop() {
        let mut store = MemStore::new();
        insert(&mut store, 10, entry(1, 1)).unwrap();
        insert(&mut store, 20, entry(2, 1)).unwrap();
        insert(&mut store, 30, entry(3, 1)).unwrap();

        let mut seen = Vec::new();
        iterate_descending(&store, |time, _| {
            seen.push(time);
            time == 20
        })
        .unwrap();
        assert_eq!(seen, vec![30, 20]);
    }

    #[test]
    fn test_all_entries_ascending() {
        let mut store = MemStore::new();
        insert(&mut store, 20, entry(3, 1)).unwrap();
        insert(&mut store, 10, entry(1, 1)).unwrap();
        insert(&mut store, 10, entry(2, 1)).unwrap();

        let owners: Vec<u8> = all_entries(&store)
            .unwrap()
            .iter()
            .map(|q| q.entry.address[0])
            .collect();
        assert_eq!(owners, vec![1, 2, 3]);
    }

    #[test]
    fn test_pending_count_and_total() {
        let mut store = MemStore::new();
        insert(&mut store, 10, entry(1, 2)).unwrap();
        insert(&mut store, 20, entry(1, 3)).unwrap();
        insert(&mut store, 20, entry(2, 4)).unwrap();

        assert_eq!(pending_count(&store, &[1u8; 32]).unwrap(), 2);
        assert_eq!(pending_count(&store, &[9u8; 32]).unwrap(), 0);
        assert_eq!(total_collateral(&store).unwrap().amount_of("musdc"), 9);
    }

    #[test]
    fn test_bucket_with_zero_collateral_is_rejected() {
        let mut store = MemStore::new();
        // Same layout as RedeemEntries, carrying a zero amount coin
        let raw: Vec<(Address, Vec<Coin>)> = vec![([1u8; 32], vec![Coin::new("musdc", 0)])];
        store
            .set(&redeem_queue_key(10), borsh::to_vec(&raw).unwrap())
            .unwrap();

        assert!(matches!(
            dequeue_mature(&mut store, 10),
            Err(UscError::Storage { .. })
        ));
        assert!(matches!(all_entries(&store), Err(UscError::Storage { .. })));
    }

    proptest! {
        #[test]
        fn prop_each_entry_released_once(
            times in proptest::collection::vec(0u64..1_000, 1..20),
            checkpoints in proptest::collection::vec(0u64..1_200, 1..10),
        ) {
            let mut store = MemStore::new();
            for (i, time) in times.iter().enumerate() {
                insert(&mut store, *time, entry(i as u8 + 1, 1)).unwrap();
            }

            let mut checkpoints = checkpoints;
            checkpoints.sort();
            checkpoints.push(u64::MAX);

            let mut released = Vec::new();
            for now in checkpoints {
                for queued in dequeue_mature(&mut store, now).unwrap() {
                    prop_assert!(queued.completion_time <= now);
                    released.push(queued.entry.address[0]);
                }
            }

            released.sort();
            let expected: Vec<u8> = (1..=times.len() as u8).collect();
            prop_assert_eq!(released, expected);
        }
    }
}
