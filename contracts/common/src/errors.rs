//! Error Types for the USC Module
//!
//! Typed errors carrying the offending values, with stable error codes for
//! logging and clients.

use thiserror::Error;

use crate::types::Amount;

/// Result type alias for USC operations
pub type UscResult<T> = Result<T, UscError>;

/// Main error enum for all USC module errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UscError {
    // ============ Request Errors ============
    /// Collateral denom is not in the recognized collateral set
    #[error("unsupported collateral denom ({denom})")]
    UnsupportedCollateral { denom: String },

    /// Redeem request denom is neither the stable denom nor an alias
    #[error("invalid stable denom: got ({got}), expected ({expected})")]
    InvalidStableDenom { got: String, expected: String },

    /// Redeem request can not be filled with any collateral
    #[error("redeem operation declined: ({requested}) yields no collateral")]
    RedeemDeclined { requested: String },

    /// Account already has the maximum number of pending redeem entries
    #[error("max number of redeem entries ({limit}) reached for ({address})")]
    MaxRedeemEntries { address: String, limit: u32 },

    /// Zero amount not allowed
    #[error("zero amount")]
    ZeroAmount,

    /// Empty collateral basket
    #[error("empty coins basket")]
    EmptyBasket,

    /// Invalid address (e.g., zero address)
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: &'static str },

    /// Coin denom is not a well-formed identifier
    #[error("malformed denom ({denom}): {reason}")]
    MalformedDenom { denom: String, reason: &'static str },

    /// Same denom listed twice in a basket
    #[error("duplicated denom ({denom})")]
    DuplicateDenom { denom: String },

    // ============ Ledger Errors ============
    /// Insufficient balance for operation
    #[error("insufficient ({denom}) balance: available ({available}), requested ({requested})")]
    InsufficientBalance {
        denom: String,
        available: Amount,
        requested: Amount,
    },

    // ============ Metadata / Params Errors ============
    /// Coin denom does not match the source meta of a conversion
    #[error("coin denom ({got}) is NE source meta denom ({expected})")]
    InvalidDenom { expected: String, got: String },

    /// Token meta failed validation
    #[error("invalid token meta ({denom}): {reason}")]
    InvalidMeta { denom: String, reason: &'static str },

    /// Params failed validation
    #[error("invalid params: {reason}")]
    InvalidParams { reason: String },

    /// Registry has no metadata for configured denoms
    #[error("metadata not found for denoms: [{}]", .denoms.join(", "))]
    MissingMetadata { denoms: Vec<String> },

    /// Registry decimals differ from configured decimals
    #[error("metadata mismatch for ({denom}): registered ({registered}), configured ({configured})")]
    MetadataMismatch {
        denom: String,
        registered: u32,
        configured: u32,
    },

    /// Module used before the recognized denoms were validated
    #[error("module is not initialized")]
    NotInitialized,

    // ============ Internal Errors ============
    /// Arithmetic overflow occurred
    #[error("arithmetic overflow")]
    Overflow,

    /// Structurally impossible state
    #[error("internal: {reason}")]
    Internal { reason: String },

    /// Stored value could not be decoded / encoded
    #[error("storage: {reason}")]
    Storage { reason: String },
}

impl UscError {
    /// Shorthand for an `Internal` error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Shorthand for an `InvalidParams` error
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }

    /// Returns a human-readable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedCollateral { .. } => "E001_UNSUPPORTED_COLLATERAL",
            Self::InvalidStableDenom { .. } => "E002_INVALID_STABLE_DENOM",
            Self::RedeemDeclined { .. } => "E003_REDEEM_DECLINED",
            Self::MaxRedeemEntries { .. } => "E004_MAX_REDEEM_ENTRIES",
            Self::ZeroAmount => "E010_ZERO_AMOUNT",
            Self::EmptyBasket => "E011_EMPTY_BASKET",
            Self::InvalidAddress { .. } => "E012_INVALID_ADDRESS",
            Self::MalformedDenom { .. } => "E013_MALFORMED_DENOM",
            Self::DuplicateDenom { .. } => "E014_DUPLICATE_DENOM",
            Self::InsufficientBalance { .. } => "E020_INSUFFICIENT_BALANCE",
            Self::InvalidDenom { .. } => "E030_INVALID_DENOM",
            Self::InvalidMeta { .. } => "E031_INVALID_META",
            Self::InvalidParams { .. } => "E032_INVALID_PARAMS",
            Self::MissingMetadata { .. } => "E033_MISSING_METADATA",
            Self::MetadataMismatch { .. } => "E034_METADATA_MISMATCH",
            Self::NotInitialized => "E035_NOT_INITIALIZED",
            Self::Overflow => "E080_OVERFLOW",
            Self::Internal { .. } => "E090_INTERNAL",
            Self::Storage { .. } => "E091_STORAGE",
        }
    }

    /// Returns true if this error is recoverable (user can fix it)
    ///
    /// Recoverable errors are returned before any side effect is applied.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCollateral { .. }
                | Self::InvalidStableDenom { .. }
                | Self::RedeemDeclined { .. }
                | Self::MaxRedeemEntries { .. }
                | Self::ZeroAmount
                | Self::EmptyBasket
                | Self::InvalidAddress { .. }
                | Self::MalformedDenom { .. }
                | Self::DuplicateDenom { .. }
                | Self::InsufficientBalance { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            UscError::UnsupportedCollateral { denom: "x".into() },
            UscError::InvalidStableDenom {
                got: "a".into(),
                expected: "b".into(),
            },
            UscError::RedeemDeclined { requested: "1ausc".into() },
            UscError::MaxRedeemEntries {
                address: "00".into(),
                limit: 7,
            },
            UscError::ZeroAmount,
            UscError::EmptyBasket,
            UscError::InvalidDenom {
                expected: "a".into(),
                got: "b".into(),
            },
            UscError::InvalidMeta {
                denom: "a".into(),
                reason: "r",
            },
            UscError::NotInitialized,
            UscError::Overflow,
            UscError::internal("x"),
            UscError::Storage { reason: "x".into() },
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_recoverable_split() {
        assert!(UscError::RedeemDeclined { requested: "1ausc".into() }.is_recoverable());
        assert!(UscError::UnsupportedCollateral { denom: "x".into() }.is_recoverable());
        assert!(!UscError::internal("boom").is_recoverable());
        assert!(!UscError::Overflow.is_recoverable());
    }

    #[test]
    fn test_missing_metadata_display() {
        let err = UscError::MissingMetadata {
            denoms: vec!["abusd".into(), "musdc".into()],
        };
        assert_eq!(err.to_string(), "metadata not found for denoms: [abusd, musdc]");
    }
}
