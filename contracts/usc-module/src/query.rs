//! Read-only queries

use serde::{Deserialize, Serialize};

use usc_common::errors::UscResult;
use usc_common::params::Params;
use usc_common::types::{Address, Coins};

use crate::ledger::Ledger;
use crate::redeem_queue::{self, QueuedRedeem};
use crate::store::KvStore;
use crate::Keeper;

/// Pool balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResponse {
    /// Collateral backing the outstanding supply
    pub active: Coins,
    /// Collateral queued for release
    pub redeeming: Coins,
}

impl<L: Ledger, S: KvStore> Keeper<L, S> {
    /// Active and Redeeming pool balances
    pub fn query_pool(&self) -> PoolResponse {
        PoolResponse {
            active: self.active_pool(),
            redeeming: self.redeeming_pool(),
        }
    }

    /// Current params
    pub fn query_params(&self) -> UscResult<Params> {
        self.params()
    }

    /// Every pending redeem entry, ascending by completion time
    pub fn query_redeem_entries(&self) -> UscResult<Vec<QueuedRedeem>> {
        redeem_queue::all_entries(&self.store)
    }

    /// Pending redeem entries of one account
    pub fn query_redeem_entries_of(&self, address: &Address) -> UscResult<Vec<QueuedRedeem>> {
        Ok(self
            .query_redeem_entries()?
            .into_iter()
            .filter(|queued| queued.entry.address == *address)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Bank, Keeper, MemStore, MintRequest, RedeemRequest};
    use usc_common::meta::{MetadataRegistry, TokenMeta};
    use usc_common::params::Params;
    use usc_common::types::{Coin, Coins};

    const ALICE: [u8; 32] = [1u8; 32];
    const BOB: [u8; 32] = [2u8; 32];

    #[test]
    fn test_queries() {
        let metas = vec![TokenMeta::new("ausc", 18), TokenMeta::new("musdc", 3)];
        let params = Params {
            redeem_delay_secs: 5,
            collateral_metas: vec![metas[1].clone()],
            ..Params::default()
        };
        let registry = MetadataRegistry::from_metas(metas).unwrap();
        let mut keeper = Keeper::with_params(Bank::new(), MemStore::new(), registry, params.clone()).unwrap();
        keeper.on_cycle_start().unwrap();
        assert_eq!(keeper.query_params().unwrap(), params);

        let usdc = Coins::single(Coin::new("musdc", 3_000));
        for who in [ALICE, BOB] {
            keeper.ledger_mut().fund(&who, &usdc).unwrap();
            keeper.mint(&MintRequest::new(who, usdc.clone()), 0).unwrap();
        }

        let one = Coin::new("ausc", 1_000_000_000_000_000_000);
        keeper.redeem(&RedeemRequest::new(ALICE, one.clone()), 10).unwrap();
        keeper.redeem(&RedeemRequest::new(BOB, one.clone()), 3).unwrap();

        let pool = keeper.query_pool();
        assert_eq!(pool.active, Coins::single(Coin::new("musdc", 4_000)));
        assert_eq!(pool.redeeming, Coins::single(Coin::new("musdc", 2_000)));

        let entries = keeper.query_redeem_entries().unwrap();
        let times: Vec<u64> = entries.iter().map(|q| q.completion_time).collect();
        assert_eq!(times, vec![8, 15]);

        let alice = keeper.query_redeem_entries_of(&ALICE).unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].completion_time, 15);
    }
}
