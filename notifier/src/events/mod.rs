//! Event recognition for pool logs
//!
//! Known events are a closed set keyed by their signature hash (topic0).
//! Anything else classifies as [`EventKind::Unknown`] and is skipped by the
//! pipeline; the registry is intentionally not exhaustive.

pub mod swap;

use std::fmt;

use alloy::primitives::B256;
use pool_events::IncomingLogEvent;

/// Event topics (keccak256 hashes)
pub mod topics {
    use alloy::{primitives::B256, sol_types::SolEvent};

    /// Swap(address indexed sender, uint amount0In, uint amount1In, uint amount0Out, uint amount1Out, address indexed to)
    pub const SWAP: B256 = super::swap::Swap::SIGNATURE_HASH;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Swap,
    Unknown,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swap => write!(f, "Swap"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

const REGISTRY: &[(B256, EventKind)] = &[(topics::SWAP, EventKind::Swap)];

/// Classify a log by its leading topic
pub fn classify(event: &IncomingLogEvent) -> EventKind {
    let Some(signature) = event.topic(0).and_then(|topic| topic.parse::<B256>().ok()) else {
        return EventKind::Unknown;
    };

    REGISTRY
        .iter()
        .find(|(hash, _)| *hash == signature)
        .map(|(_, kind)| *kind)
        .unwrap_or(EventKind::Unknown)
}
