//! Persisted key layout
//!
//! ```text
//! 0x00                      -> Params (borsh)
//! 0x01 || u64 BE timestamp  -> RedeemEntries bucket (borsh)
//! ```

use usc_common::errors::{UscError, UscResult};
use usc_common::types::Timestamp;

/// Params key
pub const PARAMS_KEY: &[u8] = &[0x00];

/// Redeem queue bucket prefix
pub const REDEEM_QUEUE_PREFIX: u8 = 0x01;

/// Length of a redeem queue key
pub const REDEEM_QUEUE_KEY_LEN: usize = 1 + 8;

/// Bucket key of a completion time
pub fn redeem_queue_key(completion_time: Timestamp) -> [u8; REDEEM_QUEUE_KEY_LEN] {
    let mut key = [0u8; REDEEM_QUEUE_KEY_LEN];
    key[0] = REDEEM_QUEUE_PREFIX;
    key[1..].copy_from_slice(&completion_time.to_be_bytes());
    key
}

/// Completion time encoded in a bucket key
pub fn parse_redeem_queue_key(key: &[u8]) -> UscResult<Timestamp> {
    if key.len() != REDEEM_QUEUE_KEY_LEN || key[0] != REDEEM_QUEUE_PREFIX {
        return Err(UscError::Storage {
            reason: format!("malformed redeem queue key ({})", hex::encode(key)),
        });
    }

    let mut raw = [0u8; 8];
    raw.copy_from_slice(&key[1..]);
    Ok(Timestamp::from_be_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order_follows_time() {
        let times = [0u64, 1, 255, 256, 110, u64::MAX];
        let mut keys: Vec<_> = times.iter().map(|t| redeem_queue_key(*t)).collect();
        keys.sort();

        let parsed: Vec<_> = keys.iter().map(|k| parse_redeem_queue_key(k).unwrap()).collect();
        assert_eq!(parsed, vec![0, 1, 110, 255, 256, u64::MAX]);
    }

    #[test]
    fn test_malformed_key() {
        assert!(parse_redeem_queue_key(PARAMS_KEY).is_err());
        assert!(parse_redeem_queue_key(&[REDEEM_QUEUE_PREFIX, 1]).is_err());
    }
}
