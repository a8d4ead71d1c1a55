//! Cycle Hooks
//!
//! Entry points the host invokes once per cycle (block).

use tracing::{error, info};

use usc_common::errors::{UscError, UscResult};
use usc_common::events::UscEvent;
use usc_common::types::{address_hex, Timestamp};
use usc_common::validation::validate_address;

use crate::ledger::Ledger;
use crate::redeem_queue::{self, QueuedRedeem};
use crate::store::KvStore;
use crate::{InitState, Keeper};

impl<L: Ledger, S: KvStore> Keeper<L, S> {
    /// Start of cycle: validate the configured denoms against the metadata
    /// registry.
    ///
    /// Runs the check once; later calls are no-ops.
    pub fn on_cycle_start(&mut self) -> UscResult<()> {
        if self.init_state == InitState::Validated {
            return Ok(());
        }

        let params = self.params()?;
        params.validate()?;
        self.registry.validate_params(&params)?;

        self.init_state = InitState::Validated;
        info!(
            stable = %params.stable_meta,
            collaterals = params.collateral_metas.len(),
            "usc module initialized"
        );
        Ok(())
    }

    /// End of cycle: release every redeem entry matured at `now`
    ///
    /// Any failure is fatal: the error is returned as is and the host must
    /// halt instead of committing a partial release.
    pub fn on_cycle_end(&mut self, now: Timestamp) -> UscResult<Vec<QueuedRedeem>> {
        let released = redeem_queue::dequeue_mature(&mut self.store, now).map_err(|e| {
            error!(now, error = %e, "dequeuing matured redeem entries");
            e
        })?;

        for queued in &released {
            self.release(queued).map_err(|e| {
                error!(
                    completion_time = queued.completion_time,
                    address = %address_hex(&queued.entry.address),
                    error = %e,
                    "releasing redeem entry"
                );
                e
            })?;
        }

        Ok(released)
    }

    fn release(&mut self, queued: &QueuedRedeem) -> UscResult<()> {
        let entry = &queued.entry;
        validate_address(&entry.address)
            .map_err(|e| UscError::internal(format!("queued redeem entry: {e}")))?;

        self.ledger
            .transfer(&self.accounts.redeeming_pool, &entry.address, &entry.collateral)
            .map_err(|e| {
                UscError::internal(format!(
                    "transferring ({}) from Redeeming pool: {e}",
                    entry.collateral
                ))
            })?;

        info!(
            address = %address_hex(&entry.address),
            collateral = %entry.collateral,
            completion_time = queued.completion_time,
            "redeem entry released"
        );
        self.events.emit(UscEvent::RedeemDone {
            address: entry.address,
            collateral: entry.collateral.clone(),
            completion_time: queued.completion_time,
        });
        Ok(())
    }
}
