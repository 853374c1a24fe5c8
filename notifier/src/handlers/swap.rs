//! Swap direction and amount resolution
//!
//! A V2 pair reports both legs of a trade as separate in/out amounts per
//! token. Direction is read from token0's "in" amount:
//! - amount0In == 0: token1 went in, token0 came out (token0 bought)
//! - amount0In != 0: token0 went in, token1 came out (token0 sold)
//!
//! When both "in" amounts are zero the trade has no meaningful direction and
//! is reported as [`Direction::Indeterminate`].

use alloy::primitives::{Address, B256, U256};
use pool_events::{IncomingLogEvent, SwapPayload, Token};

use crate::error::AppError;

use super::{HandlerResult, PipelineConfig};

/// Trade direction relative to token0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Bought,
    Sold,
    Indeterminate,
}

impl Direction {
    pub fn of(swap: &SwapPayload) -> Self {
        match (swap.amount0_in.is_zero(), swap.amount1_in.is_zero()) {
            (true, true) => Self::Indeterminate,
            (true, false) => Self::Bought,
            (false, _) => Self::Sold,
        }
    }
}

/// One side of a trade in display units
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub ticker: String,
    pub amount: f64,
}

impl Leg {
    fn new(token: &Token, raw: U256) -> Self {
        Self {
            ticker: token.ticker.clone(),
            amount: token.display_amount(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSwap {
    pub direction: Direction,
    /// Recipient of the swap output (`to`, topics[2])
    pub account: Address,
    pub amount_in: Leg,
    pub amount_out: Leg,
}

/// Resolve direction, display amounts and trading account of a swap.
///
/// Returns `Ok(None)` for an indeterminate direction, and an error when the
/// recipient topic is missing or malformed.
pub fn resolve(
    config: &PipelineConfig,
    event: &IncomingLogEvent,
    swap: &SwapPayload,
) -> HandlerResult<Option<ResolvedSwap>> {
    let direction = Direction::of(swap);

    let (amount_in, amount_out) = match direction {
        Direction::Bought => (
            Leg::new(&config.token1, swap.amount1_in),
            Leg::new(&config.token0, swap.amount0_out),
        ),
        Direction::Sold => (
            Leg::new(&config.token0, swap.amount0_in),
            Leg::new(&config.token1, swap.amount1_out),
        ),
        Direction::Indeterminate => return Ok(None),
    };

    Ok(Some(ResolvedSwap {
        direction,
        account: recipient(event)?,
        amount_in,
        amount_out,
    }))
}

/// Indexed addresses are stored right-aligned in a 32-byte topic
fn recipient(event: &IncomingLogEvent) -> HandlerResult<Address> {
    let topic = event
        .topic(2)
        .ok_or_else(|| AppError::EventDecode("Swap: missing recipient topic".into()))?;

    let word = topic
        .parse::<B256>()
        .map_err(|_| AppError::InvalidTopic(topic.to_string()))?;

    Ok(Address::from_word(word))
}
