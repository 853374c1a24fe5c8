use alloy::primitives::U256;
use thiserror::Error;

/// Largest decimal-places count whose power of ten still fits in 256 bits.
pub const MAX_DECIMALS: u8 = 77;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScaleError {
    #[error("10^{0} does not fit in 256 bits (max {MAX_DECIMALS} decimals)")]
    Overflow(u8),
}

/// Pool token as configured at startup.
///
/// `scale` is `10^decimals`, computed once so every swap reuses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub ticker: String,
    pub decimals: u8,
    pub scale: U256,
}

impl Token {
    pub fn new(ticker: impl Into<String>, decimals: u8) -> Result<Self, ScaleError> {
        Ok(Self {
            ticker: ticker.into(),
            decimals,
            scale: scale_for(decimals)?,
        })
    }

    /// Convert a raw on-chain amount of this token into display units
    pub fn display_amount(&self, raw: U256) -> f64 {
        to_display(raw, self.scale)
    }
}

/// Compute `10^decimal_places` with checked 256-bit arithmetic
pub fn scale_for(decimal_places: u8) -> Result<U256, ScaleError> {
    U256::from(10u8)
        .checked_pow(U256::from(decimal_places))
        .ok_or(ScaleError::Overflow(decimal_places))
}

/// Divide a raw amount by its scaling factor for display.
///
/// The integer part and the remainder are converted separately so amounts
/// above 2^53 raw units keep their fractional digits. Precision is that of
/// an `f64`; good enough for notifications, not for accounting.
pub fn to_display(raw: U256, scale: U256) -> f64 {
    if scale.is_zero() {
        return approx_f64(raw);
    }

    let (whole, fraction) = raw.div_rem(scale);
    approx_f64(whole) + approx_f64(fraction) / approx_f64(scale)
}

fn approx_f64(value: U256) -> f64 {
    // Decimal rendering of a U256 always parses; saturate just in case
    value.to_string().parse::<f64>().unwrap_or(f64::INFINITY)
}
