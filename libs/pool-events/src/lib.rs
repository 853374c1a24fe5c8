//! Data model shared by the swap notifier: pool tokens with their decimal
//! scale, inbound log events and decoded Swap payloads.

pub mod entity;

// Re-export commonly used types
pub use entity::{
    token::{scale_for, to_display},
    IncomingLogEvent, ScaleError, SwapPayload, Token,
};
