//! Amount parsing.

use crate::pipeline::error::SendError;

/// Sompi per KAS.
pub const SOMPI_PER_KAS: u64 = 100_000_000;

const KAS_DECIMALS: usize = 8;

/// Parse an amount already expressed in sompi.
///
/// Accepts plain decimal digits only; signs and whitespace are rejected.
pub fn parse_sompi(input: &str) -> Result<u64, SendError> {
    let invalid = |reason: String| SendError::InvalidAmount {
        input: input.to_string(),
        reason,
    };
    if input.starts_with('+') {
        return Err(invalid("sign prefix is not permitted".into()));
    }
    input.parse::<u64>().map_err(|e| invalid(e.to_string()))
}

/// Convert a decimal KAS amount (e.g. "5.25") to sompi.
pub fn kas_to_sompi(input: &str) -> Result<u64, String> {
    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(format!("'{}' is not an amount", input));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a decimal number", input));
    }
    if fraction.len() > KAS_DECIMALS {
        return Err(format!("'{}' has more than {} decimal places", input, KAS_DECIMALS));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| format!("'{}' is too large", input))?
    };
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", fraction, width = KAS_DECIMALS);
        padded.parse().map_err(|_| format!("'{}' is not a decimal number", input))?
    };

    whole
        .checked_mul(SOMPI_PER_KAS)
        .and_then(|sompi| sompi.checked_add(fraction))
        .ok_or_else(|| format!("'{}' is too large", input))
}
