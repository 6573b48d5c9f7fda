//! Human amount -> smallest-unit conversion
//!
//! Works on the decimal string directly so no binary floating point is ever
//! involved; the scaled digit string is itself the arbitrary-precision integer.

use std::iter;

use crate::shared::errors::AmountError;

/// Convert a human-entered decimal (`"1.5"`) into the token's smallest unit.
///
/// Fractional digits beyond `decimals` are truncated. The result has no
/// leading zeros, except `"0"` for a zero amount.
pub fn to_smallest_unit(amount: &str, decimals: u8) -> Result<String, AmountError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative(trimmed.to_string()));
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(AmountError::Malformed(trimmed.to_string()));
    }

    let decimals = decimals as usize;
    let kept = &fraction[..fraction.len().min(decimals)];

    let mut scaled = String::with_capacity(whole.len() + decimals);
    scaled.push_str(whole);
    scaled.push_str(kept);
    scaled.extend(iter::repeat('0').take(decimals - kept.len()));

    let canonical = scaled.trim_start_matches('0');
    if canonical.is_empty() {
        Ok("0".to_string())
    } else {
        Ok(canonical.to_string())
    }
}
