//! Genesis
//!
//! Module state snapshot: params plus the pending redeem queue. Loaded from
//! and exported to JSON.

use serde::{Deserialize, Serialize};
use tracing::info;

use usc_common::errors::{UscError, UscResult};
use usc_common::params::Params;
use usc_common::validation::validate_address;

use crate::ledger::Ledger;
use crate::redeem_queue::{self, QueuedRedeem};
use crate::store::KvStore;
use crate::Keeper;

/// Module genesis state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    /// Pending redemptions, their collateral held by the Redeeming pool
    #[serde(default)]
    pub redeem_queue: Vec<QueuedRedeem>,
}

impl GenesisState {
    /// Parse from JSON
    pub fn from_json(json: &str) -> UscResult<Self> {
        serde_json::from_str(json).map_err(|e| UscError::invalid_params(format!("genesis json: {e}")))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> UscResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| UscError::internal(format!("genesis json: {e}")))
    }

    /// Stateless genesis validation
    pub fn validate(&self) -> UscResult<()> {
        self.params.validate()?;

        for queued in &self.redeem_queue {
            validate_address(&queued.entry.address)?;
            if queued.entry.collateral.is_empty() {
                return Err(UscError::EmptyBasket);
            }
        }
        Ok(())
    }
}

/// Load genesis state into the module stores
///
/// Balances (including the Redeeming pool's) belong to the ledger's own
/// genesis.
pub fn init_genesis<L: Ledger, S: KvStore>(keeper: &mut Keeper<L, S>, genesis: GenesisState) -> UscResult<()> {
    genesis.validate()?;
    keeper.set_params(genesis.params)?;

    let entries = genesis.redeem_queue.len();
    for queued in genesis.redeem_queue {
        redeem_queue::insert(&mut keeper.store, queued.completion_time, queued.entry)?;
    }

    info!(redeem_entries = entries, "usc genesis loaded");
    Ok(())
}

/// Export the module state
pub fn export_genesis<L: Ledger, S: KvStore>(keeper: &Keeper<L, S>) -> UscResult<GenesisState> {
    Ok(GenesisState {
        params: keeper.params()?,
        redeem_queue: redeem_queue::all_entries(keeper.store())?,
    })
}
