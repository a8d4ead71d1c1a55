//! Token Metadata
//!
//! Per-denomination precision data and the conversion rules built on it.
//!
//! ## Components
//!
//! - [`TokenMeta`]: denom, decimals and description of one token
//! - [`MetadataRegistry`]: the host's registry of known token metadata,
//!   consulted once when the module initializes

use std::collections::BTreeMap;
use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::precision::MAX_DECIMALS;
use crate::errors::{UscError, UscResult};
use crate::math::convert_amount;
use crate::params::Params;
use crate::types::Coin;
use crate::validation::denom_error;

// ============================================================================
// Token Meta
// ============================================================================

/// Precision description of a single denomination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenMeta {
    /// Denomination identifier (minimal unit)
    pub denom: String,
    /// Number of decimals of the minimal unit
    pub decimals: u32,
    /// Human readable description
    #[serde(default)]
    pub description: String,
}

/// Value of one minimal unit, `10^-scale`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalUnit {
    /// Negative power of ten
    pub scale: u32,
}

impl fmt::Display for DecimalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "1");
        }
        write!(f, "0.{}1", "0".repeat(self.scale as usize - 1))
    }
}

impl TokenMeta {
    /// Create a new meta without description
    pub fn new(denom: impl Into<String>, decimals: u32) -> Self {
        Self {
            denom: denom.into(),
            decimals,
            description: String::new(),
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Basic validation: well-formed denom, supported decimals
    pub fn validate(&self) -> UscResult<()> {
        if let Some(reason) = denom_error(&self.denom) {
            return Err(UscError::InvalidMeta {
                denom: self.denom.clone(),
                reason,
            });
        }
        if self.decimals > MAX_DECIMALS {
            return Err(UscError::InvalidMeta {
                denom: self.denom.clone(),
                reason: "decimals exceed supported precision",
            });
        }
        Ok(())
    }

    /// Value of one minimal unit
    pub fn decimal_unit(&self) -> DecimalUnit {
        DecimalUnit {
            scale: self.decimals,
        }
    }

    /// Empty coin of this denom
    pub fn zero_coin(&self) -> Coin {
        Coin::zero(self.denom.clone())
    }

    /// Convert a coin of this denom to `dst`'s denom
    ///
    /// Exact when `dst` has equal or more decimals, truncates toward zero
    /// otherwise.
    pub fn convert_coin(&self, coin: &Coin, dst: &TokenMeta) -> UscResult<Coin> {
        if coin.denom != self.denom {
            return Err(UscError::InvalidDenom {
                expected: self.denom.clone(),
                got: coin.denom.clone(),
            });
        }
        self.validate()?;
        dst.validate()?;

        let amount = convert_amount(coin.amount, self.decimals, dst.decimals)?;
        Ok(Coin::new(dst.denom.clone(), amount))
    }

    /// Scale a coin of this denom up to `base`'s precision
    ///
    /// The result keeps this meta's denom: it is a comparison value only and
    /// must never be settled.
    pub fn normalize_coin(&self, coin: &Coin, base: &TokenMeta) -> UscResult<Coin> {
        if base.decimals < self.decimals {
            return Err(UscError::InvalidMeta {
                denom: base.denom.clone(),
                reason: "base decimals are LT source decimals",
            });
        }

        let normalized = self.convert_coin(coin, base)?;
        Ok(Coin::new(self.denom.clone(), normalized.amount))
    }
}

impl fmt::Display for TokenMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (decimals: {}, unit: {})", self.denom, self.decimals, self.decimal_unit())
    }
}

// ============================================================================
// Metadata Registry
// ============================================================================

/// Registry of token metadata known to the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRegistry {
    metas: BTreeMap<String, TokenMeta>,
}

impl MetadataRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of metas
    pub fn from_metas(metas: impl IntoIterator<Item = TokenMeta>) -> UscResult<Self> {
        let mut registry = Self::new();
        for meta in metas {
            registry.register(meta)?;
        }
        Ok(registry)
    }

    /// Register a meta, replacing any previous entry of the same denom
    pub fn register(&mut self, meta: TokenMeta) -> UscResult<()> {
        meta.validate()?;
        self.metas.insert(meta.denom.clone(), meta);
        Ok(())
    }

    /// Look up a denom
    pub fn get(&self, denom: &str) -> Option<&TokenMeta> {
        self.metas.get(denom)
    }

    /// Number of registered metas
    pub fn len(&self) -> usize {
        self.metas.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    /// Check that the stable denom and every collateral denom of `params`
    /// are registered with the configured decimals.
    ///
    /// Missing denoms are reported together, sorted.
    pub fn validate_params(&self, params: &Params) -> UscResult<()> {
        let configured = std::iter::once(&params.stable_meta).chain(params.collateral_metas.iter());

        let mut missing = Vec::new();
        for meta in configured {
            match self.get(&meta.denom) {
                None => missing.push(meta.denom.clone()),
                Some(registered) if registered.decimals != meta.decimals => {
                    return Err(UscError::MetadataMismatch {
                        denom: meta.denom.clone(),
                        registered: registered.decimals,
                        configured: meta.decimals,
                    });
                }
                Some(_) => {}
            }
        }

        if !missing.is_empty() {
            missing.sort();
            return Err(UscError::MissingMetadata { denoms: missing });
        }

        Ok(())
    }
}
