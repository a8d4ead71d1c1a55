//! Store trait: the minimal key-value interface the module persists through.
//!
//! Keys are compared as raw bytes, so ordered iteration over a key range is
//! ordered iteration over whatever big-endian value the key encodes.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use usc_common::errors::{UscError, UscResult};

/// Raw `(key, value)` pair
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered byte key-value store.
///
/// Writes are applied by the host's transaction model: the module assumes
/// everything written during a failed operation is discarded.
pub trait KvStore {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> UscResult<Option<Vec<u8>>>;

    /// Insert or replace a value.
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> UscResult<()>;

    /// Remove a key (no-op if absent).
    fn delete(&mut self, key: &[u8]) -> UscResult<()>;

    /// Entries with `start <= key <= end`, ascending.
    fn range(&self, start: &[u8], end: &[u8]) -> UscResult<Vec<KvPair>>;

    /// Entries whose key starts with `prefix`, descending.
    fn prefix_reverse(&self, prefix: &[u8]) -> UscResult<Vec<KvPair>>;
}

/// Extension trait for borsh encoded values.
pub trait KvStoreExt: KvStore {
    /// Get and decode a value.
    fn get_decoded<T: BorshDeserialize>(&self, key: &[u8]) -> UscResult<Option<T>> {
        match self.get(key)? {
            None => Ok(None),
            Some(bytes) => decode(&bytes).map(Some),
        }
    }

    /// Encode and store a value.
    fn set_encoded<T: BorshSerialize>(&mut self, key: &[u8], value: &T) -> UscResult<()> {
        let bytes = borsh::to_vec(value).map_err(|e| UscError::Storage {
            reason: format!("encoding value for key ({}): {e}", hex::encode(key)),
        })?;
        self.set(key, bytes)
    }
}

impl<S: KvStore + ?Sized> KvStoreExt for S {}

/// Decode a stored value.
pub fn decode<T: BorshDeserialize>(bytes: &[u8]) -> UscResult<T> {
    borsh::from_slice(bytes).map_err(|e| UscError::Storage {
        reason: format!("decoding stored value: {e}"),
    })
}

/// In-memory store for testing and simple embedders.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> UscResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> UscResult<()> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> UscResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn range(&self, start: &[u8], end: &[u8]) -> UscResult<Vec<KvPair>> {
        if start > end {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .range(start.to_vec()..=end.to_vec())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn prefix_reverse(&self, prefix: &[u8]) -> UscResult<Vec<KvPair>> {
        let mut matched: Vec<KvPair> = self
            .entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        matched.reverse();
        Ok(matched)
    }
}
