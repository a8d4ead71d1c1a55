//! Core Types for the USC Module
//!
//! Amounts, coins and coin baskets shared by every component.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::errors::{UscError, UscResult};
use crate::validation::validate_denom;

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

/// Logical timestamp supplied by the host (unix seconds)
pub type Timestamp = u64;

/// Token amount in minimal units of its denom
pub type Amount = u128;

/// Short hex form of an address for logs and error messages
pub fn address_hex(address: &Address) -> String {
    hex::encode(address)
}

// ============ Coin ============

/// A single `(denom, amount)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct Coin {
    /// Denomination identifier
    pub denom: String,
    /// Amount in minimal units
    pub amount: Amount,
}

impl Coin {
    /// Create a new coin
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Create an empty coin of a denom
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    /// Returns true if amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Add a coin of the same denom
    pub fn checked_add(&self, other: &Coin) -> UscResult<Coin> {
        self.ensure_same_denom(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or(UscError::Overflow)?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    /// Subtract a coin of the same denom
    pub fn checked_sub(&self, other: &Coin) -> UscResult<Coin> {
        self.ensure_same_denom(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| UscError::InsufficientBalance {
                denom: self.denom.clone(),
                available: self.amount,
                requested: other.amount,
            })?;
        Ok(Coin::new(self.denom.clone(), amount))
    }

    fn ensure_same_denom(&self, other: &Coin) -> UscResult<()> {
        if self.denom != other.denom {
            return Err(UscError::InvalidDenom {
                expected: self.denom.clone(),
                got: other.denom.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

// ============ Coins ============

/// A basket of coins.
///
/// Sorted by denom, no duplicate denoms, every amount strictly positive.
/// Serialized as a list of coins; decoding re-validates the list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins {
    balances: BTreeMap<String, Amount>,
}

impl Coins {
    /// Create an empty basket
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a basket from a list of coins.
    ///
    /// Rejects malformed denoms, zero amounts and duplicated denoms.
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> UscResult<Self> {
        let mut balances = BTreeMap::new();
        for coin in coins {
            validate_denom(&coin.denom)?;
            if coin.is_zero() {
                return Err(UscError::ZeroAmount);
            }
            if balances.insert(coin.denom.clone(), coin.amount).is_some() {
                return Err(UscError::DuplicateDenom { denom: coin.denom });
            }
        }
        Ok(Self { balances })
    }

    /// Basket holding a single coin (empty if the coin is zero)
    pub fn single(coin: Coin) -> Self {
        let mut coins = Self::new();
        if !coin.is_zero() {
            coins.balances.insert(coin.denom, coin.amount);
        }
        coins
    }

    /// Returns true if the basket holds nothing
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Number of distinct denoms
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Amount held of a denom (zero if absent)
    pub fn amount_of(&self, denom: &str) -> Amount {
        self.balances.get(denom).copied().unwrap_or(0)
    }

    /// Iterate `(denom, amount)` pairs in denom order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.balances.iter().map(|(denom, amount)| (denom.as_str(), *amount))
    }

    /// Denoms held, in order
    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.balances.keys().map(String::as_str)
    }

    /// Copy out as a list of coins
    pub fn to_vec(&self) -> Vec<Coin> {
        self.iter().map(|(denom, amount)| Coin::new(denom, amount)).collect()
    }

    /// Add a coin in place (zero coins are ignored)
    pub fn add_coin(&mut self, coin: &Coin) -> UscResult<()> {
        if coin.is_zero() {
            return Ok(());
        }
        let entry = self.balances.entry(coin.denom.clone()).or_insert(0);
        *entry = entry.checked_add(coin.amount).ok_or(UscError::Overflow)?;
        Ok(())
    }

    /// Sum of two baskets
    pub fn checked_add(&self, other: &Coins) -> UscResult<Coins> {
        let mut sum = self.clone();
        for (denom, amount) in other.iter() {
            sum.add_coin(&Coin::new(denom, amount))?;
        }
        Ok(sum)
    }

    /// Difference of two baskets, failing if any denom would go negative
    pub fn checked_sub(&self, other: &Coins) -> UscResult<Coins> {
        let mut diff = self.clone();
        for (denom, amount) in other.iter() {
            let available = diff.amount_of(denom);
            let left = available
                .checked_sub(amount)
                .ok_or_else(|| UscError::InsufficientBalance {
                    denom: denom.to_string(),
                    available,
                    requested: amount,
                })?;
            if left == 0 {
                diff.balances.remove(denom);
            } else {
                diff.balances.insert(denom.to_string(), left);
            }
        }
        Ok(diff)
    }

    /// Returns true if every denom of `other` is covered by this basket
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .iter()
            .all(|(denom, amount)| self.amount_of(denom) >= amount)
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = UscError;

    fn try_from(coins: Vec<Coin>) -> UscResult<Self> {
        Coins::from_coins(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.to_vec()
    }
}

impl BorshSerialize for Coins {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        BorshSerialize::serialize(&self.to_vec(), writer)
    }
}

impl BorshDeserialize for Coins {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let coins = Vec::<Coin>::deserialize_reader(reader)?;
        Coins::from_coins(coins).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(denom, amount)| format!("{amount}{denom}"))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket(raw: &[(&str, Amount)]) -> Coins {
        Coins::from_coins(raw.iter().map(|(d, a)| Coin::new(*d, *a))).unwrap()
    }

    #[test]
    fn test_from_coins_sorts_by_denom() {
        let coins = basket(&[("uusdt", 10), ("musdc", 5)]);
        assert_eq!(coins.to_string(), "5musdc,10uusdt");
        assert_eq!(coins.denoms().collect::<Vec<_>>(), vec!["musdc", "uusdt"]);
    }

    #[test]
    fn test_from_coins_rejects_bad_input() {
        assert_eq!(
            Coins::from_coins(vec![Coin::new("musdc", 0)]),
            Err(UscError::ZeroAmount)
        );
        assert!(matches!(
            Coins::from_coins(vec![Coin::new("musdc", 1), Coin::new("musdc", 2)]),
            Err(UscError::DuplicateDenom { .. })
        ));
        assert!(matches!(
            Coins::from_coins(vec![Coin::new("#Invalid", 1)]),
            Err(UscError::MalformedDenom { .. })
        ));
    }

    #[test]
    fn test_add_and_sub() {
        let a = basket(&[("musdc", 5), ("uusdt", 10)]);
        let b = basket(&[("musdc", 5)]);

        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.amount_of("musdc"), 10);

        let diff = a.checked_sub(&b).unwrap();
        assert_eq!(diff, basket(&[("uusdt", 10)]));

        let err = b.checked_sub(&a).unwrap_err();
        assert!(matches!(err, UscError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_is_all_gte() {
        let a = basket(&[("musdc", 5), ("uusdt", 10)]);
        assert!(a.is_all_gte(&basket(&[("uusdt", 10)])));
        assert!(!a.is_all_gte(&basket(&[("abusd", 1)])));
        assert!(a.is_all_gte(&Coins::new()));
    }

    #[test]
    fn test_coin_denom_mismatch() {
        let a = Coin::new("musdc", 1);
        let b = Coin::new("uusdt", 1);
        assert!(matches!(a.checked_add(&b), Err(UscError::InvalidDenom { .. })));
    }

    #[test]
    fn test_coins_json_is_a_list() {
        let coins = basket(&[("musdc", 5)]);
        let json = serde_json::to_string(&coins).unwrap();
        assert_eq!(json, r#"[{"denom":"musdc","amount":5}]"#);

        let bad = serde_json::from_str::<Coins>(r#"[{"denom":"musdc","amount":0}]"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_coins_borsh_is_validated() {
        let coins = basket(&[("musdc", 5), ("uusdt", 10)]);
        let bytes = borsh::to_vec(&coins).unwrap();
        assert_eq!(bytes, borsh::to_vec(&coins.to_vec()).unwrap());
        assert_eq!(borsh::from_slice::<Coins>(&bytes).unwrap(), coins);

        let zero = borsh::to_vec(&vec![Coin::new("musdc", 0)]).unwrap();
        assert!(borsh::from_slice::<Coins>(&zero).is_err());

        let duplicated = borsh::to_vec(&vec![Coin::new("musdc", 1), Coin::new("musdc", 2)]).unwrap();
        assert!(borsh::from_slice::<Coins>(&duplicated).is_err());

        let malformed = borsh::to_vec(&vec![Coin::new("#Invalid", 1)]).unwrap();
        assert!(borsh::from_slice::<Coins>(&malformed).is_err());
    }

    #[test]
    fn test_single_ignores_zero() {
        assert!(Coins::single(Coin::zero("ausc")).is_empty());
        assert_eq!(Coins::single(Coin::new("ausc", 3)).amount_of("ausc"), 3);
    }
}
