pub mod log_event;
pub mod swap;
pub mod token;

// Re-exports for convenience
pub use log_event::IncomingLogEvent;
pub use swap::SwapPayload;
pub use token::{ScaleError, Token};
