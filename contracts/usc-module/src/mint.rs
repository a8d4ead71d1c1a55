//! Mint
//!
//! Deposit a collateral basket into the Active pool and receive the stable
//! token 1:1.

use serde::{Deserialize, Serialize};
use tracing::info;

use usc_common::check;
use usc_common::collateral::collaterals_to_stable;
use usc_common::errors::{UscError, UscResult};
use usc_common::events::UscEvent;
use usc_common::types::{address_hex, Address, Coin, Coins, Timestamp};
use usc_common::validation::{validate_address, validate_denom};

use crate::ledger::Ledger;
use crate::store::KvStore;
use crate::Keeper;

/// Mint request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Depositor, receives the stable token
    pub address: Address,
    /// Collateral to deposit
    pub collateral: Coins,
}

impl MintRequest {
    pub fn new(address: Address, collateral: Coins) -> Self {
        Self { address, collateral }
    }

    /// Stateless checks
    pub fn validate_basic(&self) -> UscResult<()> {
        validate_address(&self.address)?;
        check!(!self.collateral.is_empty(), UscError::EmptyBasket);
        for (denom, amount) in self.collateral.iter() {
            validate_denom(denom)?;
            check!(amount > 0, UscError::ZeroAmount);
        }
        Ok(())
    }
}

/// Mint result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintResponse {
    /// Stable token credited to the depositor
    pub minted: Coin,
    /// Collateral moved into the Active pool
    pub collateral_used: Coins,
}

impl<L: Ledger, S: KvStore> Keeper<L, S> {
    /// Mint the stable token against a collateral basket
    ///
    /// Unsupported denoms reject the whole basket; nothing moves unless every
    /// check passes.
    pub fn mint(&mut self, request: &MintRequest, now: Timestamp) -> UscResult<MintResponse> {
        self.ensure_initialized()?;
        request.validate_basic()?;
        check!(
            !self.accounts.contains(&request.address),
            UscError::InvalidAddress {
                reason: "module account can not mint"
            }
        );

        let params = self.params()?;
        let conversion = collaterals_to_stable(&params, &request.collateral)?;
        if !request.collateral.is_all_gte(&conversion.used) {
            return Err(UscError::internal("used collateral exceeds deposit"));
        }

        // Every fallible ledger precondition is checked before the first move
        if !self.ledger.balances(&request.address).is_all_gte(&conversion.used) {
            let (denom, available, requested) = conversion
                .used
                .iter()
                .map(|(denom, amount)| (denom, self.ledger.balance_of(&request.address, denom), amount))
                .find(|(_, available, amount)| available < amount)
                .ok_or_else(|| UscError::internal("balance check disagrees with ledger"))?;
            return Err(UscError::InsufficientBalance {
                denom: denom.to_string(),
                available,
                requested,
            });
        }
        self.ledger
            .total_supply(&conversion.stable.denom)
            .checked_add(conversion.stable.amount)
            .ok_or(UscError::Overflow)?;

        let minted = Coins::single(conversion.stable.clone());
        self.ledger
            .transfer(&request.address, &self.accounts.active_pool, &conversion.used)?;
        self.ledger.mint(&self.accounts.module, &minted)?;
        self.ledger
            .transfer(&self.accounts.module, &request.address, &minted)?;

        info!(
            address = %address_hex(&request.address),
            collateral = %conversion.used,
            minted = %conversion.stable,
            "stable token minted"
        );
        self.events.emit(UscEvent::Minted {
            address: request.address,
            collateral: conversion.used.clone(),
            minted: conversion.stable.clone(),
            timestamp: now,
        });

        Ok(MintResponse {
            minted: conversion.stable,
            collateral_used: conversion.used,
        })
    }
}
