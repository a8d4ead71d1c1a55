//! Decimal Conversion Math
//!
//! Exact integer conversion between denominations of different decimal
//! precision. A conversion computes
//!
//! ```text
//! result = floor(amount * 10^-src_decimals / 10^-dst_decimals)
//!        = floor(amount * 10^dst_decimals / 10^src_decimals)
//! ```
//!
//! Converting to equal or more decimals is exact. Converting to fewer
//! decimals truncates toward zero, so value is only ever lost, never created.

use crate::constants::precision::MAX_DECIMALS;
use crate::errors::{UscError, UscResult};
use crate::types::Amount;

/// 10^exp as an exact u128
pub fn pow10(exp: u32) -> UscResult<Amount> {
    if exp > MAX_DECIMALS {
        return Err(UscError::Overflow);
    }
    10u128.checked_pow(exp).ok_or(UscError::Overflow)
}

/// Convert an amount between two decimal precisions
///
/// # Arguments
/// * `amount` - Amount in minimal units of the source denom
/// * `src_decimals` - Decimals of the source denom
/// * `dst_decimals` - Decimals of the destination denom
///
/// # Returns
/// Amount in minimal units of the destination denom, truncated toward zero
pub fn convert_amount(amount: Amount, src_decimals: u32, dst_decimals: u32) -> UscResult<Amount> {
    if src_decimals == dst_decimals {
        return Ok(amount);
    }

    if dst_decimals > src_decimals {
        let multiplier = pow10(dst_decimals - src_decimals)?;
        amount.checked_mul(multiplier).ok_or(UscError::Overflow)
    } else {
        let divisor = pow10(src_decimals - dst_decimals)?;
        amount.checked_div(divisor).ok_or(UscError::Overflow)
    }
}
