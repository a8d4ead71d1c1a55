//! Module Events
//!
//! Events are collected during execution and handed to the host, which
//! decides how to index or publish them.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::types::{Address, Coin, Coins, Timestamp};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    Minted = 0x01,
    RedeemQueued = 0x02,
    RedeemDone = 0x03,
    ParamsUpdated = 0x10,
}

/// Main event enum containing all module events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum UscEvent {
    /// Collateral deposited, stable token minted
    Minted {
        address: Address,
        collateral: Coins,
        minted: Coin,
        timestamp: Timestamp,
    },

    /// Stable token burned, collateral moved to the Redeeming pool
    RedeemQueued {
        address: Address,
        burned: Coin,
        collateral: Coins,
        completion_time: Timestamp,
    },

    /// Matured redeem entry released to its owner
    RedeemDone {
        address: Address,
        collateral: Coins,
        completion_time: Timestamp,
    },

    /// Params replaced
    ParamsUpdated {
        redeem_delay_secs: u64,
        max_redeem_entries: u32,
        collateral_denoms: Vec<String>,
    },
}

impl UscEvent {
    /// Get the event type
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Minted { .. } => EventType::Minted,
            Self::RedeemQueued { .. } => EventType::RedeemQueued,
            Self::RedeemDone { .. } => EventType::RedeemDone,
            Self::ParamsUpdated { .. } => EventType::ParamsUpdated,
        }
    }

    /// Account the event concerns, if any
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::Minted { address, .. }
            | Self::RedeemQueued { address, .. }
            | Self::RedeemDone { address, .. } => Some(address),
            Self::ParamsUpdated { .. } => None,
        }
    }

    /// Serialize event to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<UscEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: UscEvent) {
        self.events.push(event);
    }

    /// Get all events
    pub fn events(&self) -> &[UscEvent] {
        &self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&UscEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events were emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain all events, leaving the log empty
    pub fn take(&mut self) -> Vec<UscEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued() -> UscEvent {
        UscEvent::RedeemQueued {
            address: [2u8; 32],
            burned: Coin::new("ausc", 1_000),
            collateral: Coins::single(Coin::new("musdc", 1)),
            completion_time: 110,
        }
    }

    #[test]
    fn test_event_type() {
        assert_eq!(queued().event_type(), EventType::RedeemQueued);
        assert_eq!(queued().address(), Some(&[2u8; 32]));
    }

    #[test]
    fn test_event_serialization() {
        let event = queued();
        let bytes = event.to_bytes();
        let restored = UscEvent::from_bytes(&bytes).unwrap();
        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();
        assert!(!log.has_events());

        log.emit(queued());
        log.emit(UscEvent::RedeemDone {
            address: [2u8; 32],
            collateral: Coins::single(Coin::new("musdc", 1)),
            completion_time: 110,
        });

        assert_eq!(log.len(), 2);
        assert_eq!(log.filter_by_type(EventType::RedeemDone).len(), 1);

        let drained = log.take();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }
}
