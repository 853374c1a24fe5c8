//! Swap event decoder
//!
//! Event signature: Swap(address indexed sender, uint amount0In, uint amount1In, uint amount0Out, uint amount1Out, address indexed to)
//! Topic0: 0xd78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822

use alloy::{primitives::hex, sol, sol_types::SolEvent};
use pool_events::{IncomingLogEvent, SwapPayload};

use crate::error::AppError;

sol! {
    /// Uniswap V2 pair interface, Swap event
    #[derive(Debug)]
    event Swap(
        address indexed sender,
        uint256 amount0In,
        uint256 amount1In,
        uint256 amount0Out,
        uint256 amount1Out,
        address indexed to
    );
}

/// Decode the non-indexed Swap arguments from a log's `data`.
///
/// Data layout (each 32 bytes): amount0In, amount1In, amount0Out, amount1Out.
/// Truncated or non-hex data is reported as [`AppError::EventDecode`].
pub fn decode(event: &IncomingLogEvent) -> Result<SwapPayload, AppError> {
    let data = hex::decode(&event.data)
        .map_err(|e| AppError::EventDecode(format!("Swap: data is not valid hex: {e}")))?;

    let amounts = Swap::abi_decode_data(&data, true)
        .map_err(|e| AppError::EventDecode(format!("Swap: {} bytes of data: {e}", data.len())))?;

    Ok(SwapPayload::from(amounts))
}
