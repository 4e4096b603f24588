//! Integer money helpers.
//!
//! The core only ever computes in minor units (`i64`). Decimal major-unit
//! amounts exist at the edges, for reading user input and for display.

use crate::core::error::ValidationError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// An amount in the smallest indivisible unit of a currency (e.g. cents).
pub type MinorUnits = i64;

/// Largest number of minor-unit digits an amount can carry. `10^19` no longer
/// fits in an `i64`.
pub const MAX_EXPONENT: u32 = 18;

/// Convert a major-unit decimal (e.g. `12.34`) into minor units.
///
/// The conversion is exact: an amount with more fractional digits than
/// `exponent` is rejected rather than rounded.
///
/// # Examples
///
/// ```
/// use grouppay_engine::core::money::to_minor_units;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(to_minor_units(dec!(12.34), 2).unwrap(), 1234);
/// assert!(to_minor_units(dec!(12.345), 2).is_err());
/// ```
pub fn to_minor_units(amount: Decimal, exponent: u32) -> Result<MinorUnits, ValidationError> {
    if exponent > MAX_EXPONENT {
        return Err(ValidationError::UnsupportedExponent(exponent));
    }
    let overflow = || ValidationError::Overflow(format!("{amount} does not fit in minor units"));

    let factor = 10i64
        .checked_pow(exponent)
        .map(Decimal::from)
        .ok_or_else(overflow)?;
    let scaled = amount.checked_mul(factor).ok_or_else(overflow)?;

    if !scaled.fract().is_zero() {
        return Err(ValidationError::FractionalMinorUnits { amount, exponent });
    }
    scaled.to_i64().ok_or_else(overflow)
}

/// Convert minor units back into a major-unit decimal for display.
///
/// Fails for an exponent above [`MAX_EXPONENT`].
pub fn from_minor_units(units: MinorUnits, exponent: u32) -> Result<Decimal, ValidationError> {
    if exponent > MAX_EXPONENT {
        return Err(ValidationError::UnsupportedExponent(exponent));
    }
    Decimal::try_new(units, exponent).map_err(|_| ValidationError::UnsupportedExponent(exponent))
}

/// Split `amount` into `parts` integer pieces that sum to `amount` exactly.
///
/// The remainder is handed out one unit at a time, starting with the first
/// piece. Returns an empty vector when `parts` is zero.
pub fn split_evenly(amount: MinorUnits, parts: usize) -> Vec<MinorUnits> {
    if parts == 0 {
        return Vec::new();
    }
    // usize -> i64 only truncates past 2^63 participants
    let n = parts as i64;
    let base = amount.div_euclid(n);
    let remainder = amount.rem_euclid(n) as usize;

    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Sum minor-unit values without risk of overflow.
pub fn wide_sum<I>(values: I) -> i128
where
    I: IntoIterator<Item = MinorUnits>,
{
    values.into_iter().map(i128::from).sum()
}
