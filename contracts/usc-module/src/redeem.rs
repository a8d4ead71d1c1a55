//! Redeem
//!
//! Burn the stable token (or a bridged alias of it) and queue the matching
//! Active pool collateral for release after the redeem delay.

use serde::{Deserialize, Serialize};
use tracing::info;

use usc_common::check;
use usc_common::errors::{UscError, UscResult};
use usc_common::events::UscEvent;
use usc_common::redemption::stable_to_collaterals;
use usc_common::types::{address_hex, Address, Coin, Coins, Timestamp};
use usc_common::validation::{validate_address, validate_denom};

use crate::ledger::Ledger;
use crate::redeem_queue::{self, RedeemEntry};
use crate::store::KvStore;
use crate::Keeper;

/// Redeem request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemRequest {
    /// Redeemer, receives the collateral once the entry matures
    pub address: Address,
    /// Stable token to redeem
    pub amount: Coin,
}

impl RedeemRequest {
    pub fn new(address: Address, amount: Coin) -> Self {
        Self { address, amount }
    }

    /// Stateless checks
    pub fn validate_basic(&self) -> UscResult<()> {
        validate_address(&self.address)?;
        validate_denom(&self.amount.denom)?;
        check!(!self.amount.is_zero(), UscError::ZeroAmount);
        Ok(())
    }
}

/// Redeem result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemResponse {
    /// Stable token burned (may be less than requested on a partial fill)
    pub burned: Coin,
    /// Collateral queued for release
    pub collateral: Coins,
    /// Earliest release time
    pub completion_time: Timestamp,
}

impl<L: Ledger, S: KvStore> Keeper<L, S> {
    /// Redeem the stable token for Active pool collateral
    ///
    /// Only the part of the request the pool can cover is charged, and only
    /// that part must be held. A request that yields no collateral is
    /// declined without side effects.
    pub fn redeem(&mut self, request: &RedeemRequest, now: Timestamp) -> UscResult<RedeemResponse> {
        self.ensure_initialized()?;
        request.validate_basic()?;
        check!(
            !self.accounts.contains(&request.address),
            UscError::InvalidAddress {
                reason: "module account can not redeem"
            }
        );

        let params = self.params()?;
        params.stable_meta_for(&request.amount.denom)?;

        if params.max_redeem_entries > 0 {
            let pending = redeem_queue::pending_count(&self.store, &request.address)?;
            if pending >= params.max_redeem_entries {
                return Err(UscError::MaxRedeemEntries {
                    address: address_hex(&request.address),
                    limit: params.max_redeem_entries,
                });
            }
        }

        // Only the filled part is charged, so only that part must be held
        let distribution = stable_to_collaterals(&params, &request.amount, &self.active_pool())?;
        let available = self.ledger.balance_of(&request.address, &request.amount.denom);
        if available < distribution.stable_used.amount {
            return Err(UscError::InsufficientBalance {
                denom: request.amount.denom.clone(),
                available,
                requested: distribution.stable_used.amount,
            });
        }
        let unfilled = distribution.stable_left(&request.amount)?;
        let completion_time = now
            .checked_add(params.redeem_delay_secs)
            .ok_or(UscError::Overflow)?;

        let burned = Coins::single(distribution.stable_used.clone());
        self.ledger
            .transfer(&request.address, &self.accounts.module, &burned)?;
        self.ledger.burn(&self.accounts.module, &burned)?;
        self.ledger.transfer(
            &self.accounts.active_pool,
            &self.accounts.redeeming_pool,
            &distribution.collaterals,
        )?;
        redeem_queue::insert(
            &mut self.store,
            completion_time,
            RedeemEntry {
                address: request.address,
                collateral: distribution.collaterals.clone(),
            },
        )?;

        info!(
            address = %address_hex(&request.address),
            requested = %request.amount,
            burned = %distribution.stable_used,
            unfilled = %unfilled,
            collateral = %distribution.collaterals,
            completion_time,
            "redeem queued"
        );
        self.events.emit(UscEvent::RedeemQueued {
            address: request.address,
            burned: distribution.stable_used.clone(),
            collateral: distribution.collaterals.clone(),
            completion_time,
        });

        Ok(RedeemResponse {
            burned: distribution.stable_used,
            collateral: distribution.collaterals,
            completion_time,
        })
    }
}
