//! Module Parameters
//!
//! Runtime configuration read by every mint and redeem. Params are only
//! mutated through an explicit update which runs [`Params::validate`].

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::errors::{UscError, UscResult};
use crate::meta::TokenMeta;
use crate::validation::validate_alias_denom;

/// USC module parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Params {
    /// Delay between redeem acceptance and collateral release (seconds)
    pub redeem_delay_secs: u64,
    /// Maximum pending redeem entries per account (0 = unlimited)
    pub max_redeem_entries: u32,
    /// Recognized collateral metas (unique denoms)
    pub collateral_metas: Vec<TokenMeta>,
    /// Stable token meta
    pub stable_meta: TokenMeta,
    /// Bridged denoms accepted as the stable token on redeem
    pub stable_alias_denoms: Vec<String>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            redeem_delay_secs: defaults::REDEEM_DELAY_SECS,
            max_redeem_entries: defaults::MAX_REDEEM_ENTRIES,
            collateral_metas: Vec::new(),
            stable_meta: TokenMeta::new(defaults::STABLE_DENOM, defaults::STABLE_DECIMALS)
                .with_description(defaults::STABLE_DESCRIPTION),
            stable_alias_denoms: Vec::new(),
        }
    }
}

impl Params {
    /// Full params validation
    ///
    /// - stable meta and every collateral meta are valid
    /// - collateral denoms are unique and never the stable denom
    /// - stable decimals are GTE every collateral's decimals, so that
    ///   collateral -> stable conversion is lossless
    /// - alias denoms are bridged denoms, unique and disjoint from the rest
    pub fn validate(&self) -> UscResult<()> {
        self.stable_meta
            .validate()
            .map_err(|e| UscError::invalid_params(format!("stable_meta: {e}")))?;

        let stable_denom = &self.stable_meta.denom;
        let mut collateral_denoms = BTreeSet::new();
        for meta in &self.collateral_metas {
            meta.validate()
                .map_err(|e| UscError::invalid_params(format!("collateral_metas: {e}")))?;

            if &meta.denom == stable_denom {
                return Err(UscError::invalid_params(format!(
                    "collateral_metas: stable denom ({stable_denom}) found"
                )));
            }
            if !collateral_denoms.insert(meta.denom.as_str()) {
                return Err(UscError::invalid_params(format!(
                    "collateral_metas: ({}) duplicated",
                    meta.denom
                )));
            }
            if meta.decimals > self.stable_meta.decimals {
                return Err(UscError::invalid_params(format!(
                    "stable precision ({}) must be GTE collateral ({}) precision ({})",
                    self.stable_meta.decimals, meta.denom, meta.decimals
                )));
            }
        }

        let mut alias_denoms = BTreeSet::new();
        for denom in &self.stable_alias_denoms {
            validate_alias_denom(denom)
                .map_err(|e| UscError::invalid_params(format!("stable_alias_denoms: {e}")))?;

            if denom == stable_denom || collateral_denoms.contains(denom.as_str()) {
                return Err(UscError::invalid_params(format!(
                    "stable_alias_denoms: ({denom}) collides with a configured denom"
                )));
            }
            if !alias_denoms.insert(denom.as_str()) {
                return Err(UscError::invalid_params(format!(
                    "stable_alias_denoms: ({denom}) duplicated"
                )));
            }
        }

        Ok(())
    }

    /// Stable token denom
    pub fn stable_denom(&self) -> &str {
        &self.stable_meta.denom
    }

    /// Canonical stable denom followed by every alias
    pub fn stable_denoms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.stable_denom()).chain(self.stable_alias_denoms.iter().map(String::as_str))
    }

    /// Meta of a recognized collateral denom
    pub fn collateral_meta(&self, denom: &str) -> Option<&TokenMeta> {
        self.collateral_metas.iter().find(|meta| meta.denom == denom)
    }

    /// Returns true if the denom is a recognized collateral
    pub fn is_collateral(&self, denom: &str) -> bool {
        self.collateral_meta(denom).is_some()
    }

    /// Resolve a redeem request denom to the stable meta it is accounted in
    ///
    /// Alias denoms share the stable decimals.
    pub fn stable_meta_for(&self, denom: &str) -> UscResult<TokenMeta> {
        if denom == self.stable_meta.denom {
            return Ok(self.stable_meta.clone());
        }
        if self.stable_alias_denoms.iter().any(|alias| alias == denom) {
            return Ok(TokenMeta {
                denom: denom.to_string(),
                decimals: self.stable_meta.decimals,
                description: self.stable_meta.description.clone(),
            });
        }

        Err(UscError::InvalidStableDenom {
            got: denom.to_string(),
            expected: self.stable_meta.denom.clone(),
        })
    }

    /// Common comparison precision: the highest decimals across the stable
    /// meta and every collateral meta
    pub fn base_meta(&self) -> TokenMeta {
        let decimals = self
            .collateral_metas
            .iter()
            .map(|meta| meta.decimals)
            .fold(self.stable_meta.decimals, u32::max);

        TokenMeta::new(self.stable_meta.denom.clone(), decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIAS: &str = "ibc/000102030405060708090A0B0C0D0E0F101112131415161718191A1B1C1D1E1F";

    fn valid_params() -> Params {
        Params {
            redeem_delay_secs: 1,
            max_redeem_entries: 7,
            collateral_metas: vec![TokenMeta::new("usdt", 6), TokenMeta::new("musdc", 3)],
            stable_meta: TokenMeta::new("ausc", 8),
            stable_alias_denoms: vec![ALIAS.to_string()],
        }
    }

    #[test]
    fn test_valid_params() {
        assert!(valid_params().validate().is_ok());
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Params)>)> = vec![
            ("invalid stable denom", Box::new(|p| p.stable_meta.denom = "#Invalid".into())),
            (
                "stable denom among collaterals",
                Box::new(|p| {
                    let stable = p.stable_meta.clone();
                    p.collateral_metas.push(stable)
                }),
            ),
            (
                "duplicated collateral",
                Box::new(|p| {
                    let first = p.collateral_metas[0].clone();
                    p.collateral_metas.push(first)
                }),
            ),
            ("stable not the highest decimals", Box::new(|p| p.stable_meta.decimals = 2)),
            ("stable decimals above precision limit", Box::new(|p| p.stable_meta.decimals = 30)),
            ("alias not bridged", Box::new(|p| p.stable_alias_denoms.push("uusc".into()))),
            (
                "duplicated alias",
                Box::new(|p| p.stable_alias_denoms.push(ALIAS.to_string())),
            ),
        ];

        for (name, mutate) in cases {
            let mut params = valid_params();
            mutate(&mut params);
            assert!(
                matches!(params.validate(), Err(UscError::InvalidParams { .. })),
                "{name} should fail"
            );
        }
    }

    #[test]
    fn test_stable_meta_for() {
        let params = valid_params();

        assert_eq!(params.stable_meta_for("ausc").unwrap(), params.stable_meta);

        let alias = params.stable_meta_for(ALIAS).unwrap();
        assert_eq!(alias.denom, ALIAS);
        assert_eq!(alias.decimals, 8);

        assert!(matches!(
            params.stable_meta_for("musdc"),
            Err(UscError::InvalidStableDenom { .. })
        ));
    }

    #[test]
    fn test_base_meta_uses_max_decimals() {
        let params = valid_params();
        assert_eq!(params.base_meta().decimals, 8);

        let mut unvalidated = valid_params();
        unvalidated.collateral_metas.push(TokenMeta::new("abusd", 18));
        assert_eq!(unvalidated.base_meta().decimals, 18);
    }

    #[test]
    fn test_params_json() {
        let params = valid_params();
        let json = serde_json::to_string(&params).unwrap();
        let decoded: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, params);
    }
}
