//! Collateral to Stable Conversion
//!
//! Pure part of the mint path. A deposited basket is valued 1:1 in the
//! stable denom; the module side (ledger moves, supply changes) only runs
//! once the whole basket converts.
//!
//! ## Rules
//!
//! - Every basket denom must be a recognized collateral, otherwise the whole
//!   basket is rejected with `UnsupportedCollateral`
//! - Conversion collateral -> stable is lossless because params guarantee
//!   stable decimals >= every collateral's decimals
//! - The "used" basket is derived by converting each stable share back into
//!   the collateral denom; anything that does not round-trip stays with the
//!   depositor

use crate::errors::{UscError, UscResult};
use crate::params::Params;
use crate::types::{Coin, Coins};

/// Result of valuing a collateral basket in the stable denom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintConversion {
    /// Stable amount to mint
    pub stable: Coin,
    /// Collateral actually backing `stable`
    pub used: Coins,
}

/// Value a collateral basket in the stable denom
///
/// # Arguments
/// * `params` - Validated module params
/// * `basket` - Deposited collateral
///
/// # Returns
/// Stable amount and the collateral basket consumed for it
pub fn collaterals_to_stable(params: &Params, basket: &Coins) -> UscResult<MintConversion> {
    if basket.is_empty() {
        return Err(UscError::EmptyBasket);
    }

    // Reject before converting anything
    if let Some(denom) = basket.denoms().find(|denom| !params.is_collateral(denom)) {
        return Err(UscError::UnsupportedCollateral {
            denom: denom.to_string(),
        });
    }

    let stable_meta = &params.stable_meta;
    let mut stable = stable_meta.zero_coin();
    let mut used = Coins::new();

    for (denom, amount) in basket.iter() {
        let meta = params
            .collateral_meta(denom)
            .ok_or_else(|| UscError::UnsupportedCollateral {
                denom: denom.to_string(),
            })?;

        let converted = meta
            .convert_coin(&Coin::new(denom, amount), stable_meta)
            .map_err(|e| UscError::internal(format!("converting collateral ({denom}) to stable: {e}")))?;
        let used_coin = stable_meta
            .convert_coin(&converted, meta)
            .map_err(|e| UscError::internal(format!("converting stable to collateral ({denom}): {e}")))?;

        stable = stable.checked_add(&converted)?;
        used.add_coin(&used_coin)?;
    }

    Ok(MintConversion { stable, used })
}
