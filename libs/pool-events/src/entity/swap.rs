use alloy::primitives::U256;

/// Non-indexed arguments of a pool `Swap` event.
///
/// A regular swap has exactly one non-zero "in" amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapPayload {
    pub amount0_in: U256,
    pub amount1_in: U256,
    pub amount0_out: U256,
    pub amount1_out: U256,
}

impl From<(U256, U256, U256, U256)> for SwapPayload {
    fn from(
        (amount0_in, amount1_in, amount0_out, amount1_out): (U256, U256, U256, U256),
    ) -> Self {
        Self {
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
        }
    }
}
