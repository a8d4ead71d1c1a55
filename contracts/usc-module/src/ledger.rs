//! Ledger collaborator
//!
//! Balance bookkeeping is owned by the host. The module only needs the
//! operations below; every call either applies fully or fails without
//! changing any balance.

use std::collections::BTreeMap;

use usc_common::errors::{UscError, UscResult};
use usc_common::types::{Address, Amount, Coins};

/// Trait for balance ledger operations
pub trait Ledger {
    /// Balance of a single denom
    fn balance_of(&self, account: &Address, denom: &str) -> Amount;

    /// All balances of an account
    fn balances(&self, account: &Address) -> Coins;

    /// Move coins between accounts
    fn transfer(&mut self, from: &Address, to: &Address, coins: &Coins) -> UscResult<()>;

    /// Create coins on an account, increasing supply
    fn mint(&mut self, account: &Address, coins: &Coins) -> UscResult<()>;

    /// Destroy coins held by an account, decreasing supply
    fn burn(&mut self, account: &Address, coins: &Coins) -> UscResult<()>;

    /// Total supply of a denom
    fn total_supply(&self, denom: &str) -> Amount;
}

/// In-memory ledger
#[derive(Debug, Clone, Default)]
pub struct Bank {
    accounts: BTreeMap<Address, Coins>,
    supply: Coins,
}

impl Bank {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account, as a genesis allocation would
    pub fn fund(&mut self, account: &Address, coins: &Coins) -> UscResult<()> {
        self.mint(account, coins)
    }

    fn store(&mut self, account: &Address, coins: Coins) {
        if coins.is_empty() {
            self.accounts.remove(account);
        } else {
            self.accounts.insert(*account, coins);
        }
    }
}

impl Ledger for Bank {
    fn balance_of(&self, account: &Address, denom: &str) -> Amount {
        self.accounts
            .get(account)
            .map(|coins| coins.amount_of(denom))
            .unwrap_or(0)
    }

    fn balances(&self, account: &Address) -> Coins {
        self.accounts.get(account).cloned().unwrap_or_default()
    }

    fn transfer(&mut self, from: &Address, to: &Address, coins: &Coins) -> UscResult<()> {
        if coins.is_empty() || from == to {
            return Ok(());
        }

        let debited = self.balances(from).checked_sub(coins)?;
        let credited = self.balances(to).checked_add(coins)?;

        self.store(from, debited);
        self.store(to, credited);
        Ok(())
    }

    fn mint(&mut self, account: &Address, coins: &Coins) -> UscResult<()> {
        let credited = self.balances(account).checked_add(coins)?;
        let supply = self.supply.checked_add(coins)?;

        self.store(account, credited);
        self.supply = supply;
        Ok(())
    }

    fn burn(&mut self, account: &Address, coins: &Coins) -> UscResult<()> {
        let debited = self.balances(account).checked_sub(coins)?;
        let supply = self
            .supply
            .checked_sub(coins)
            .map_err(|e| UscError::internal(format!("burning above total supply: {e}")))?;

        self.store(account, debited);
        self.supply = supply;
        Ok(())
    }

    fn total_supply(&self, denom: &str) -> Amount {
        self.supply.amount_of(denom)
    }
}
