//! Invariants
//!
//! Read-only reconciliation checks, safe to run between any two operations.
//! Each returns a diagnostic message and a `broken` flag.

use usc_common::collateral::collaterals_to_stable;
use usc_common::constants::module;
use usc_common::errors::{UscError, UscResult};
use usc_common::types::{Amount, Coin, Coins};

use crate::ledger::Ledger;
use crate::redeem_queue;
use crate::store::KvStore;
use crate::Keeper;

/// `(message, broken)`
pub type InvariantResult = (String, bool);

fn format_invariant(name: &str, msg: &str) -> String {
    format!("{}: {} invariant\n{}", module::NAME, name, msg)
}

/// Run every invariant, stopping at the first broken one
pub fn all_invariants<L: Ledger, S: KvStore>(keeper: &Keeper<L, S>) -> InvariantResult {
    let checks: [fn(&Keeper<L, S>) -> InvariantResult; 2] = [
        redeeming_queue_invariant::<L, S>,
        supply_invariant::<L, S>,
    ];

    let mut messages = Vec::with_capacity(checks.len());
    for check in checks {
        let (msg, broken) = check(keeper);
        if broken {
            return (msg, true);
        }
        messages.push(msg);
    }
    (messages.join("\n"), false)
}

/// Redeeming pool balance equals the collateral of every queued entry
pub fn redeeming_queue_invariant<L: Ledger, S: KvStore>(keeper: &Keeper<L, S>) -> InvariantResult {
    const NAME: &str = "Redeeming pool and redeem queue";

    let pool = keeper.redeeming_pool();
    let queued = match redeem_queue::total_collateral(keeper.store()) {
        Ok(total) => total,
        Err(e) => {
            return (
                format_invariant(NAME, &format!("\tfailed to read redeem queue: {e}\n")),
                true,
            )
        }
    };

    let broken = pool != queued;
    let msg = format!(
        "\tRedeeming pool tokens: {pool}\n\
         \tRedeem queue tokens: {queued}\n"
    );
    (format_invariant(NAME, &msg), broken)
}

/// Stable supply (canonical plus alias denoms) equals the Active pool value
pub fn supply_invariant<L: Ledger, S: KvStore>(keeper: &Keeper<L, S>) -> InvariantResult {
    const NAME: &str = "stable supply and Active pool balance";

    match supply_report(keeper) {
        Ok((msg, broken)) => (format_invariant(NAME, &msg), broken),
        Err(e) => (format_invariant(NAME, &format!("\tfailed to evaluate: {e}\n")), true),
    }
}

fn supply_report<L: Ledger, S: KvStore>(keeper: &Keeper<L, S>) -> UscResult<InvariantResult> {
    let params = keeper.params()?;
    let ledger = keeper.ledger();

    let mut supply: Amount = 0;
    for denom in params.stable_denoms() {
        supply = supply
            .checked_add(ledger.total_supply(denom))
            .ok_or(UscError::Overflow)?;
    }

    let pool = keeper.active_pool();
    let mut recognized = Coins::new();
    let mut unrecognized = Coins::new();
    for (denom, amount) in pool.iter() {
        let coin = Coin::new(denom, amount);
        if params.is_collateral(denom) {
            recognized.add_coin(&coin)?;
        } else {
            unrecognized.add_coin(&coin)?;
        }
    }

    let backing = if recognized.is_empty() {
        0
    } else {
        collaterals_to_stable(&params, &recognized)?.stable.amount
    };

    let broken = supply != backing;
    let msg = format!(
        "\tStable supply: {supply}{stable}\n\
         \tActive pool collateral tokens: {pool}\n\
         \tActive pool converted tokens: {backing}{stable}\n\
         \tUnrecognized Active pool tokens: {unrecognized}\n",
        stable = params.stable_denom(),
    );
    Ok((msg, broken))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redeem_queue::RedeemEntry;
    use crate::{Bank, MemStore, MintRequest};
    use usc_common::meta::{MetadataRegistry, TokenMeta};
    use usc_common::params::Params;

    const ALICE: [u8; 32] = [1u8; 32];

    fn keeper() -> Keeper<Bank, MemStore> {
        let metas = vec![TokenMeta::new("ausc", 18), TokenMeta::new("uusdt", 6)];
        let params = Params {
            collateral_metas: vec![metas[1].clone()],
            ..Params::default()
        };
        let registry = MetadataRegistry::from_metas(metas).unwrap();
        let mut keeper = Keeper::with_params(Bank::new(), MemStore::new(), registry, params).unwrap();
        keeper.on_cycle_start().unwrap();
        keeper
    }

    #[test]
    fn test_fresh_module_holds_invariants() {
        let keeper = keeper();
        let (msg, broken) = all_invariants(&keeper);
        assert!(!broken, "{msg}");
    }

    #[test]
    fn test_supply_after_mint() {
        let mut keeper = keeper();
        let usdt = Coins::single(Coin::new("uusdt", 5_000_000));
        keeper.ledger_mut().fund(&ALICE, &usdt).unwrap();
        keeper.mint(&MintRequest::new(ALICE, usdt), 0).unwrap();

        assert!(!supply_invariant(&keeper).1);
    }

    #[test]
    fn test_supply_broken_by_unbacked_mint() {
        let mut keeper = keeper();
        keeper
            .ledger_mut()
            .fund(&ALICE, &Coins::single(Coin::new("ausc", 1)))
            .unwrap();

        let (msg, broken) = supply_invariant(&keeper);
        assert!(broken);
        assert!(msg.contains("Stable supply: 1ausc"));
    }

    #[test]
    fn test_redeeming_pool_broken_by_orphan_entry() {
        let mut keeper = keeper();
        redeem_queue::insert(
            &mut keeper.store,
            10,
            RedeemEntry {
                address: ALICE,
                collateral: Coins::single(Coin::new("uusdt", 1)),
            },
        )
        .unwrap();

        assert!(redeeming_queue_invariant(&keeper).1);
        assert!(all_invariants(&keeper).1);
    }
}
