//! Validation Helpers for the USC Module
//!
//! Centralized validation utilities shared by params, metadata and request
//! handling.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use usc_common::validation::{check, validate_denom};
//!
//! check!(amount > 0, UscError::ZeroAmount);
//! validate_denom("musdc")?;
//! ```

use crate::{
    constants::denom,
    errors::{UscError, UscResult},
    types::Address,
};

// ============ Validation Macro ============

/// Check a condition and return an error if it fails.
///
/// # Examples
///
/// ```rust,ignore
/// check!(!basket.is_empty(), UscError::EmptyBasket);
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr, $error:expr) => {
        if !($condition) {
            return Err($error);
        }
    };
}

pub use check;

// ============ Denom Validation ============

/// Returns the reason a denom is malformed, if any.
///
/// Accepted form: `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn denom_error(value: &str) -> Option<&'static str> {
    let len = value.len();
    if len < denom::MIN_LEN {
        return Some("too short");
    }
    if len > denom::MAX_LEN {
        return Some("too long");
    }

    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Some("must start with a letter"),
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        None
    } else {
        Some("contains invalid characters")
    }
}

/// Validate a coin denom.
pub fn validate_denom(value: &str) -> UscResult<()> {
    match denom_error(value) {
        None => Ok(()),
        Some(reason) => Err(UscError::MalformedDenom {
            denom: value.to_string(),
            reason,
        }),
    }
}

/// Validate a bridged stable alias denom (`ibc/<64 hex chars>`).
pub fn validate_alias_denom(value: &str) -> UscResult<()> {
    let hash = value.strip_prefix(denom::ALIAS_PREFIX).ok_or_else(|| {
        UscError::invalid_params(format!(
            "alias denom ({value}): not a bridged token ({} prefix)",
            denom::ALIAS_PREFIX
        ))
    })?;

    if hash.len() != denom::ALIAS_HASH_HEX_LEN || hex::decode(hash).is_err() {
        return Err(UscError::invalid_params(format!(
            "alias denom ({value}): hash must be {} hex chars",
            denom::ALIAS_HASH_HEX_LEN
        )));
    }

    validate_denom(value)
}

// ============ Address Validation ============

/// Validate that an address is usable as an account.
pub fn validate_address(address: &Address) -> UscResult<()> {
    if *address == [0u8; 32] {
        return Err(UscError::InvalidAddress {
            reason: "zero address",
        });
    }

    Ok(())
}
