//! U256 arithmetic for fee values and fiat conversion.
//!
//! Fee values stay in base units (wei) as U256 until the final conversion
//! to a whole-unit f64 for display.

use alloy::primitives::U256;

/// Largest power of ten that fits in a U256.
const MAX_U256_POW10: u8 = 77;

/// Power of 10 as U256. Valid for `exp <= 77`.
#[inline(always)]
pub fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Fee in base units: `gas * price_per_gas_unit`.
#[inline(always)]
pub fn fee_value(gas: u128, price_per_gas_unit: u128) -> U256 {
    U256::from(gas).saturating_mul(U256::from(price_per_gas_unit))
}

/// Convert a U256 to f64 (lossy above 2^53).
pub fn u256_to_f64(value: U256) -> f64 {
    if value <= U256::from(u128::MAX) {
        let value: u128 = value.to();
        return value as f64;
    }

    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}

/// Convert base units to whole units using the asset's decimal precision.
///
/// Integer and fractional parts are converted separately so whole amounts
/// convert exactly.
pub fn to_common_units(value: U256, decimals: u8) -> f64 {
    if decimals == 0 {
        return u256_to_f64(value);
    }
    if decimals > MAX_U256_POW10 {
        return u256_to_f64(value) / 10_f64.powi(decimals as i32);
    }

    let divisor = pow10(decimals);
    let whole = value / divisor;
    let fraction = value % divisor;

    u256_to_f64(whole) + u256_to_f64(fraction) / 10_f64.powi(decimals as i32)
}

/// Fiat value of a fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FiatValue {
    /// No price available for the asset
    Unknown,
    /// Amount in the display currency
    Amount(f64),
}

impl FiatValue {
    /// Get the amount, if known.
    pub fn amount(&self) -> Option<f64> {
        match self {
            FiatValue::Unknown => None,
            FiatValue::Amount(amount) => Some(*amount),
        }
    }

    /// Check if the value is unknown.
    pub fn is_unknown(&self) -> bool {
        matches!(self, FiatValue::Unknown)
    }
}

/// Convert a fee in base units to fiat.
///
/// An absent price yields [`FiatValue::Unknown`], never zero.
pub fn fee_to_fiat(value: U256, decimals: u8, price: Option<f64>) -> FiatValue {
    match price {
        Some(price) => FiatValue::Amount(to_common_units(value, decimals) * price),
        None => FiatValue::Unknown,
    }
}
