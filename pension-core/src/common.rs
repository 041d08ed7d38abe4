//! Shared helpers for monetary amounts.
//!
//! The backend exchanges currency values as strings with exactly two decimal
//! places, while users type salaries with spaces or commas as thousands
//! separators. These helpers convert between the two.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error returned when a string cannot be parsed as an amount.
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount in the `digits.digits` wire form the backend expects.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Strips whitespace (including non-breaking spaces) and comma thousands separators.
fn normalize_amount_input(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect()
}

/// Parses user-typed text such as `"6 000"` or `"1,234.56"` into a [`Decimal`].
///
/// Empty input is an error here: a salary field left blank is not zero.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn format_amount_pads_to_two_places() {
        assert_eq!(format_amount(dec!(6000)), "6000.00");
        assert_eq!(format_amount(dec!(4850.5)), "4850.50");
        assert_eq!(format_amount(dec!(0)), "0.00");
    }

    #[test]
    fn format_amount_rounds_extra_places() {
        assert_eq!(format_amount(dec!(1234.567)), "1234.57");
    }

    #[test]
    fn parse_amount_accepts_spaces_and_commas() {
        assert_eq!(parse_amount("6 000").unwrap(), dec!(6000));
        assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("  7500  ").unwrap(), dec!(7500));
        assert_eq!(parse_amount("12\u{a0}500").unwrap(), dec!(12500));
    }

    #[test]
    fn parse_amount_rejects_garbage_and_empty() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }
}
