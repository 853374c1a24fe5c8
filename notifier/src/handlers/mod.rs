//! Swap handling for the monitored pool
//!
//! Handlers turn a decoded event into the values needed for a notification:
//! trade direction, per-leg display amounts and the trading account.

pub mod swap;

use pool_events::Token;

use crate::error::AppError;

/// Where the notification links point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    /// Block explorer base, `/address/<addr>` and `/tx/<hash>` are appended
    pub explorer_url: String,
    /// DEX pool page base, `/<pool address>` is appended
    pub pool_info_url: String,
    pub dex_name: String,
}

/// Read-only settings shared by every pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Matched exactly (case-sensitive) against the log's emitting address
    pub contract_address: String,
    pub token0: Token,
    pub token1: Token,
    pub links: Links,
}

impl PipelineConfig {
    /// Pool pair label, e.g. `ETH-USDT`
    pub fn pool_pair(&self) -> String {
        format!("{}-{}", self.token0.ticker, self.token1.ticker)
    }
}

/// Result type for handlers
pub type HandlerResult<T> = Result<T, AppError>;
