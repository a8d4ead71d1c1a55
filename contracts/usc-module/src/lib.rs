//! USC Module
//!
//! Stateful side of the USC stable token: collateral deposits mint the
//! stable token 1:1, redemptions burn it and release collateral after a
//! delay.
//!
//! The module owns no balances itself. It drives two host collaborators:
//!
//! - a [`Ledger`] holding every balance (users, module account, pools)
//! - a [`KvStore`] holding params and the redeem delay queue
//!
//! ## Accounts
//!
//! | Account          | Holds                                              |
//! |------------------|----------------------------------------------------|
//! | module           | stable tokens in flight during mint / burn         |
//! | Active pool      | collateral backing the outstanding stable supply   |
//! | Redeeming pool   | collateral earmarked for queued redemptions        |
//!
//! ## Lifecycle
//!
//! The host calls [`Keeper::on_cycle_start`] once per cycle: the first call
//! checks the configured denoms against the metadata registry and moves the
//! module from `Uninitialized` to `Validated`. Mint and redeem are refused
//! until then. [`Keeper::on_cycle_end`] releases matured redemptions.

use sha2::{Digest, Sha256};
use tracing::info;

use usc_common::constants::module;
use usc_common::errors::{UscError, UscResult};
use usc_common::events::{EventLog, UscEvent};
use usc_common::meta::MetadataRegistry;
use usc_common::params::Params;
use usc_common::types::{Address, Coins};

pub mod store;
pub mod ledger;
pub mod keys;
pub mod redeem_queue;
pub mod mint;
pub mod redeem;
pub mod hooks;
pub mod invariants;
pub mod query;
pub mod genesis;


pub use ledger::{Bank, Ledger};
pub use store::{KvStore, KvStoreExt, MemStore};
pub use redeem_queue::{QueuedRedeem, RedeemEntry};
pub use mint::{MintRequest, MintResponse};
pub use redeem::{RedeemRequest, RedeemResponse};
pub use query::PoolResponse;
pub use genesis::GenesisState;

// ============ Module Accounts ============

/// Derive the ledger address of a module-owned account
pub fn module_address(name: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"module");
    hasher.update(name.as_bytes());
    let result = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&result);
    address
}

/// Ledger addresses owned by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleAccounts {
    /// Mints and burns the stable token
    pub module: Address,
    /// Collateral backing the outstanding supply
    pub active_pool: Address,
    /// Collateral in transit to redeemers
    pub redeeming_pool: Address,
}

impl ModuleAccounts {
    /// Derive every module account
    pub fn derive() -> Self {
        Self {
            module: module_address(module::NAME),
            active_pool: module_address(module::ACTIVE_POOL),
            redeeming_pool: module_address(module::REDEEMING_POOL),
        }
    }

    /// Returns true if the address belongs to the module
    pub fn contains(&self, address: &Address) -> bool {
        *address == self.module || *address == self.active_pool || *address == self.redeeming_pool
    }
}

// ============ Keeper ============

/// Initialization phase of the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// Configured denoms not yet checked against the registry
    Uninitialized,
    /// Configured denoms match the registry
    Validated,
}

/// USC module keeper
pub struct Keeper<L: Ledger, S: KvStore> {
    ledger: L,
    store: S,
    registry: MetadataRegistry,
    accounts: ModuleAccounts,
    init_state: InitState,
    events: EventLog,
}

impl<L: Ledger, S: KvStore> Keeper<L, S> {
    /// Create a keeper over existing collaborators
    ///
    /// Params must already be stored, or be set through genesis or
    /// [`Keeper::set_params`] before use.
    pub fn new(ledger: L, store: S, registry: MetadataRegistry) -> Self {
        Self {
            ledger,
            store,
            registry,
            accounts: ModuleAccounts::derive(),
            init_state: InitState::Uninitialized,
            events: EventLog::new(),
        }
    }

    /// Create a keeper and store validated params
    pub fn with_params(ledger: L, store: S, registry: MetadataRegistry, params: Params) -> UscResult<Self> {
        let mut keeper = Self::new(ledger, store, registry);
        keeper.set_params(params)?;
        Ok(keeper)
    }

    // ============ Collaborators ============

    /// Ledger collaborator
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable ledger collaborator (host-side funding, tests)
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Store collaborator
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Metadata registry
    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    /// Module account addresses
    pub fn accounts(&self) -> &ModuleAccounts {
        &self.accounts
    }

    // ============ Initialization ============

    /// Current initialization phase
    pub fn init_state(&self) -> InitState {
        self.init_state
    }

    /// Returns true once the configured denoms were validated
    pub fn is_initialized(&self) -> bool {
        self.init_state == InitState::Validated
    }

    pub(crate) fn ensure_initialized(&self) -> UscResult<()> {
        match self.init_state {
            InitState::Validated => Ok(()),
            InitState::Uninitialized => Err(UscError::NotInitialized),
        }
    }

    // ============ Params ============

    /// Current params
    pub fn params(&self) -> UscResult<Params> {
        self.store
            .get_decoded(keys::PARAMS_KEY)?
            .ok_or_else(|| UscError::Storage {
                reason: "params are not set".into(),
            })
    }

    /// Replace params
    ///
    /// Params are validated first; once the module is initialized they must
    /// also match the metadata registry.
    pub fn set_params(&mut self, params: Params) -> UscResult<()> {
        params.validate()?;
        if self.is_initialized() {
            self.registry.validate_params(&params)?;
        }

        self.store.set_encoded(keys::PARAMS_KEY, &params)?;

        info!(
            redeem_delay_secs = params.redeem_delay_secs,
            max_redeem_entries = params.max_redeem_entries,
            collaterals = params.collateral_metas.len(),
            "params updated"
        );
        self.events.emit(UscEvent::ParamsUpdated {
            redeem_delay_secs: params.redeem_delay_secs,
            max_redeem_entries: params.max_redeem_entries,
            collateral_denoms: params.collateral_metas.iter().map(|m| m.denom.clone()).collect(),
        });
        Ok(())
    }

    // ============ Pools ============

    /// Active pool balances
    pub fn active_pool(&self) -> Coins {
        self.ledger.balances(&self.accounts.active_pool)
    }

    /// Redeeming pool balances
    pub fn redeeming_pool(&self) -> Coins {
        self.ledger.balances(&self.accounts.redeeming_pool)
    }

    // ============ Events ============

    /// Events emitted so far
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand every emitted event to the host
    pub fn take_events(&mut self) -> Vec<UscEvent> {
        self.events.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usc_common::meta::TokenMeta;

    fn registry() -> MetadataRegistry {
        MetadataRegistry::from_metas(vec![TokenMeta::new("ausc", 18), TokenMeta::new("uusdt", 6)]).unwrap()
    }

    fn params() -> Params {
        Params {
            collateral_metas: vec![TokenMeta::new("uusdt", 6)],
            ..Params::default()
        }
    }

    #[test]
    fn test_module_accounts_distinct() {
        let accounts = ModuleAccounts::derive();
        assert_ne!(accounts.module, accounts.active_pool);
        assert_ne!(accounts.active_pool, accounts.redeeming_pool);
        assert_eq!(accounts.module, module_address(module::NAME));
        assert!(accounts.contains(&accounts.redeeming_pool));
        assert!(!accounts.contains(&[1u8; 32]));
    }

    #[test]
    fn test_params_round_trip_through_store() {
        let keeper = Keeper::with_params(Bank::new(), MemStore::new(), registry(), params()).unwrap();
        assert_eq!(keeper.params().unwrap(), params());
        assert_eq!(keeper.init_state(), InitState::Uninitialized);
    }

    #[test]
    fn test_missing_params() {
        let keeper = Keeper::new(Bank::new(), MemStore::new(), registry());
        assert!(matches!(keeper.params(), Err(UscError::Storage { .. })));
    }

    #[test]
    fn test_invalid_params_not_stored() {
        let mut keeper = Keeper::with_params(Bank::new(), MemStore::new(), registry(), params()).unwrap();

        let mut bad = params();
        bad.stable_meta.decimals = 2;
        assert!(matches!(keeper.set_params(bad), Err(UscError::InvalidParams { .. })));
        assert_eq!(keeper.params().unwrap(), params());
    }

    #[test]
    fn test_set_params_checks_registry_once_initialized() {
        let mut keeper = Keeper::with_params(Bank::new(), MemStore::new(), registry(), params()).unwrap();
        keeper.on_cycle_start().unwrap();

        let mut unknown = params();
        unknown.collateral_metas.push(TokenMeta::new("musdc", 3));
        assert!(matches!(
            keeper.set_params(unknown),
            Err(UscError::MissingMetadata { .. })
        ));
    }

    #[test]
    fn test_params_update_event() {
        let mut keeper = Keeper::with_params(Bank::new(), MemStore::new(), registry(), params()).unwrap();
        let events = keeper.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], UscEvent::ParamsUpdated { .. }));
        assert!(!keeper.events().has_events());
    }
}
