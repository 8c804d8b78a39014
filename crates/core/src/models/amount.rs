//! Decimal amount codec.
//!
//! User-facing amounts are decimal strings ("1.5"); on-chain amounts are
//! integers in minimal units ("15000000000" for 1.5 DOT). All arithmetic is
//! arbitrary precision, floating point never touches an on-chain value.

use std::str::FromStr;

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode};

use crate::error::AmountError;

/// Most integer digits an amount may carry, well above any on-chain balance.
pub const MAX_INTEGER_DIGITS: i64 = 40;

/// Most fractional digits an amount may carry, trailing zeros included.
pub const MAX_FRACTION_DIGITS: i64 = 64;

/// A non-negative decimal amount in whole-token units.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(BigDecimal);

impl Amount {
    /// Parse a decimal string, rejecting negative and non-finite input.
    ///
    /// Exponent notation is accepted but the result must stay within
    /// [`MAX_INTEGER_DIGITS`] and [`MAX_FRACTION_DIGITS`].
    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Malformed(raw.to_string()));
        }

        let value = BigDecimal::from_str(trimmed)
            .map_err(|_| AmountError::Malformed(trimmed.to_string()))?;

        if value.sign() == Sign::Minus {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        let (_, scale) = value.as_bigint_and_exponent();
        let integer_digits = i64::try_from(value.digits())
            .unwrap_or(i64::MAX)
            .saturating_sub(scale);
        if scale > MAX_FRACTION_DIGITS || integer_digits > MAX_INTEGER_DIGITS {
            return Err(AmountError::Malformed(trimmed.to_string()));
        }

        Ok(Self(value))
    }

    pub fn is_positive(&self) -> bool {
        self.0.sign() == Sign::Plus
    }

    /// Convert to an integer string of minimal units.
    ///
    /// Fails if the amount has more fractional digits than `decimals`.
    pub fn to_minimal_units(&self, decimals: u32) -> Result<String, AmountError> {
        let (digits, scale) = self.0.as_bigint_and_exponent();
        let scaled = BigDecimal::new(digits, scale - i64::from(decimals));

        if !scaled.is_integer() {
            return Err(AmountError::TooPrecise {
                amount: self.to_string(),
                decimals,
            });
        }

        let (units, _) = scaled.with_scale(0).into_bigint_and_exponent();
        Ok(units.to_string())
    }

    /// Render with exactly `precision` fractional digits (half-up rounding).
    pub fn to_fixed(&self, precision: u32) -> String {
        let rounded = self
            .0
            .with_scale_round(i64::from(precision), RoundingMode::HalfUp);
        format_plain(&rounded, true)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_plain(&self.0, false))
    }
}

// =============================================================================
// Codec functions
// =============================================================================

/// Formatting options for [`from_minimal_units`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Round to this many fractional digits (half-up). `None` keeps full precision.
    pub precision: Option<u32>,
    /// Keep trailing zeros up to the precision.
    pub pad: bool,
}

/// Convert a decimal amount string to minimal units.
pub fn to_minimal_units(amount: &str, decimals: u32) -> Result<String, AmountError> {
    Amount::parse(amount)?.to_minimal_units(decimals)
}

/// Convert a minimal-unit integer string back to a decimal string.
pub fn from_minimal_units(
    units: &str,
    decimals: u32,
    options: DisplayOptions,
) -> Result<String, AmountError> {
    let trimmed = units.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        return Err(AmountError::Malformed(units.to_string()));
    }

    let digits =
        BigInt::from_str(trimmed).map_err(|_| AmountError::Malformed(trimmed.to_string()))?;
    if digits.sign() == Sign::Minus {
        return Err(AmountError::Negative(trimmed.to_string()));
    }

    let mut value = BigDecimal::new(digits, i64::from(decimals));
    if let Some(precision) = options.precision {
        value = value.with_scale_round(i64::from(precision), RoundingMode::HalfUp);
    }

    Ok(format_plain(&value, options.pad))
}

/// Positional notation without exponent.
fn format_plain(value: &BigDecimal, pad: bool) -> String {
    let (digits, scale) = value.as_bigint_and_exponent();
    let sign = if digits.sign() == Sign::Minus { "-" } else { "" };
    let mut magnitude = digits.magnitude().to_string();

    if scale <= 0 {
        magnitude.push_str(&"0".repeat(scale.unsigned_abs() as usize));
        return format!("{sign}{magnitude}");
    }

    let scale = scale as usize;
    if magnitude.len() <= scale {
        magnitude = format!("{}{}", "0".repeat(scale - magnitude.len() + 1), magnitude);
    }

    let (integer, fraction) = magnitude.split_at(magnitude.len() - scale);
    let fraction = if pad {
        fraction
    } else {
        fraction.trim_end_matches('0')
    };

    if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}.{fraction}")
    }
}
