//! Redemption Distribution
//!
//! Pure part of the redeem path: picks which Active pool collaterals (and
//! how much of each) pay out a stable redemption.
//!
//! ## Algorithm
//!
//! 1. Resolve the request denom (canonical stable denom or an alias)
//! 2. Drop pool denoms that are no longer recognized collateral
//! 3. Order pool coins by their amount normalized to the common base
//!    precision, largest first; equal amounts put the greater denom first
//! 4. Greedy fill: take from each pool coin up to the remaining request,
//!    converting back to collateral (truncating) and charging only the
//!    stable value actually obtained
//!
//! A request the pool cannot fully cover is partially filled; a request that
//! yields no collateral at all is declined.

use std::cmp::Ordering;

use tracing::warn;

use crate::errors::{UscError, UscResult};
use crate::meta::TokenMeta;
use crate::params::Params;
use crate::types::{Amount, Coin, Coins};

/// Pool coin with its comparison amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCoin {
    /// Pool balance of the denom
    pub coin: Coin,
    /// Pool balance at the common base precision
    pub normalized: Amount,
}

/// Result of distributing a redemption over the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemDistribution {
    /// Stable amount charged to the redeemer (request denom)
    pub stable_used: Coin,
    /// Collateral paid out
    pub collaterals: Coins,
}

impl RedeemDistribution {
    /// Stable amount left with the redeemer
    pub fn stable_left(&self, requested: &Coin) -> UscResult<Coin> {
        requested.checked_sub(&self.stable_used)
    }
}

/// Order the pool for redemption
///
/// Denoms missing from the collateral set are logged and skipped.
pub fn rank_pool(params: &Params, pool: &Coins) -> UscResult<Vec<RankedCoin>> {
    let base = params.base_meta();

    let mut ranked = Vec::with_capacity(pool.len());
    for (denom, amount) in pool.iter() {
        let Some(meta) = params.collateral_meta(denom) else {
            warn!(denom, amount = %amount, "active pool denom is not a recognized collateral, skipping");
            continue;
        };

        let coin = Coin::new(denom, amount);
        let normalized = meta
            .normalize_coin(&coin, &base)
            .map_err(|e| UscError::internal(format!("normalizing pool denom ({denom}): {e}")))?;
        ranked.push(RankedCoin {
            coin,
            normalized: normalized.amount,
        });
    }

    ranked.sort_by(compare_ranked);
    Ok(ranked)
}

/// Descending by normalized amount, then descending by denom
fn compare_ranked(a: &RankedCoin, b: &RankedCoin) -> Ordering {
    b.normalized
        .cmp(&a.normalized)
        .then_with(|| b.coin.denom.cmp(&a.coin.denom))
}

/// Distribute a stable redemption over the Active pool
///
/// # Arguments
/// * `params` - Validated module params
/// * `requested` - Stable coin to redeem (canonical or alias denom)
/// * `pool` - Active pool snapshot
pub fn stable_to_collaterals(
    params: &Params,
    requested: &Coin,
    pool: &Coins,
) -> UscResult<RedeemDistribution> {
    let stable_meta = params.stable_meta_for(&requested.denom)?;
    if requested.is_zero() {
        return Err(UscError::ZeroAmount);
    }

    let mut left = requested.amount;
    let mut collaterals = Coins::new();

    for ranked in rank_pool(params, pool)? {
        let meta = params
            .collateral_meta(&ranked.coin.denom)
            .ok_or_else(|| UscError::internal(format!("ranked denom ({}) lost its meta", ranked.coin.denom)))?;

        let taken = take_from_pool(meta, &stable_meta, &ranked.coin, left)?;
        let Some((collateral, consumed)) = taken else {
            continue;
        };

        left = left
            .checked_sub(consumed)
            .ok_or_else(|| UscError::internal("consumed more stable than requested"))?;
        collaterals.add_coin(&collateral)?;

        if left == 0 {
            break;
        }
    }

    if collaterals.is_empty() {
        return Err(UscError::RedeemDeclined {
            requested: requested.to_string(),
        });
    }

    let used = requested
        .amount
        .checked_sub(left)
        .ok_or_else(|| UscError::internal("stable left exceeds request"))?;

    Ok(RedeemDistribution {
        stable_used: Coin::new(requested.denom.clone(), used),
        collaterals,
    })
}

/// One greedy step: returns the collateral taken and the stable value it
/// consumes, or `None` when truncation leaves nothing to take.
fn take_from_pool(
    meta: &TokenMeta,
    stable_meta: &TokenMeta,
    pool_coin: &Coin,
    stable_left: Amount,
) -> UscResult<Option<(Coin, Amount)>> {
    let convert = |coin: &Coin, src: &TokenMeta, dst: &TokenMeta| {
        src.convert_coin(coin, dst).map_err(|e| {
            UscError::internal(format!("converting {} -> {}: {e}", src.denom, dst.denom))
        })
    };

    let pool_value = convert(pool_coin, meta, stable_meta)?;
    let reduce = stable_left.min(pool_value.amount);

    let collateral = convert(&Coin::new(stable_meta.denom.clone(), reduce), stable_meta, meta)?;
    if collateral.is_zero() {
        return Ok(None);
    }

    let consumed = convert(&collateral, meta, stable_meta)?;
    Ok(Some((collateral, consumed.amount)))
}
