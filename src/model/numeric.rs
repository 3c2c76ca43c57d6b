//! Parsing and formatting of decimal cell values.
//!
//! Cell values are parsed into `Decimal` so that sums are exact, and written back out as
//! fixed-point strings with exactly [`FRACTION_DIGITS`] digits after the decimal point.

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

/// The number of digits after the decimal point in every aggregated numeric cell.
pub const FRACTION_DIGITS: u32 = 8;

/// An optional leading minus, one or more ASCII digits, then optionally a point and zero or more
/// ASCII digits. Nothing else: no whitespace, no thousands separators, no exponent, no currency.
/// `\d` would also match non-ASCII digits, which `Decimal` does not parse.
static DECIMAL_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+\.?[0-9]*$").expect("decimal literal pattern is valid")
});

/// Returns true if `s` looks like a signed integer or decimal literal, e.g. `-12`, `3.`, `0.25`.
/// This is the test used to decide whether a column holds numbers.
pub fn is_decimal_literal(s: &str) -> bool {
    DECIMAL_LITERAL.is_match(s)
}

/// Parses a cell value into a `Decimal`. Surrounding whitespace is ignored and scientific
/// notation is accepted. Blank and non-numeric text return `None`; nothing is coerced to zero.
///
/// ```
/// # use csv_rollup::model::parse_decimal;
/// assert_eq!(parse_decimal("0.1").unwrap().to_string(), "0.1");
/// assert_eq!(parse_decimal("1e3").unwrap().to_string(), "1000");
/// assert!(parse_decimal("").is_none());
/// assert!(parse_decimal("twelve").is_none());
/// ```
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    // "3." is a valid literal for classification; drop the bare point before parsing.
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Why a value that must be numeric did not parse.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Unparsed {
    /// Not a number at all.
    NotANumber,
    /// A well-formed literal outside the range of `Decimal`.
    OutOfRange,
}

/// Like [`parse_decimal`], but tells a malformed value apart from a literal that is too large.
pub(crate) fn parse_required(s: &str) -> Result<Decimal, Unparsed> {
    match parse_decimal(s) {
        Some(value) => Ok(value),
        None if is_decimal_literal(s.trim()) => Err(Unparsed::OutOfRange),
        None => Err(Unparsed::NotANumber),
    }
}

/// Formats `value` with exactly [`FRACTION_DIGITS`] fractional digits, rounding half away from
/// zero at the last place.
///
/// ```
/// # use csv_rollup::model::format_fixed;
/// # use rust_decimal::Decimal;
/// assert_eq!(format_fixed(Decimal::new(6, 1)), "0.60000000");
/// assert_eq!(format_fixed(Decimal::new(-75, 0)), "-75.00000000");
/// ```
pub fn format_fixed(value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    // `rescale` cannot keep eight places for values near the top of the range.
    format!("{rounded:.prec$}", prec = FRACTION_DIGITS as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_literals() {
        for s in ["0", "-1", "42", "3.", "3.14", "-0.5", "007"] {
            assert!(is_decimal_literal(s), "{s} should be a decimal literal");
        }
    }

    #[test]
    fn test_not_decimal_literals() {
        for s in [
            "", " 1", "1 ", "+1", ".5", "1,000", "1e5", "$5", "1.2.3", "-", "abc", "1-2",
            "١٢", "１２",
        ] {
            assert!(!is_decimal_literal(s), "{s} should not be a decimal literal");
        }
    }

    #[test]
    fn test_parse_decimal_is_exact() {
        let sum = parse_decimal("0.1").unwrap() + parse_decimal("0.2").unwrap();
        assert_eq!(sum, parse_decimal("0.3").unwrap());
    }

    #[test]
    fn test_parse_decimal_trailing_point() {
        assert_eq!(parse_decimal("3."), Some(Decimal::new(3, 0)));
        assert!(parse_decimal(".").is_none());
    }

    #[test]
    fn test_parse_decimal_trims() {
        assert_eq!(parse_decimal("  -4.50 "), Some(Decimal::new(-450, 2)));
    }

    #[test]
    fn test_parse_decimal_rejects_text() {
        assert!(parse_decimal("NaN").is_none());
        assert!(parse_decimal("   ").is_none());
        assert!(parse_decimal("12 apples").is_none());
    }

    #[test]
    fn test_format_fixed_pads() {
        assert_eq!(format_fixed(Decimal::new(3, 0)), "3.00000000");
        assert_eq!(format_fixed(Decimal::ZERO), "0.00000000");
    }

    #[test]
    fn test_format_fixed_rounds_half_away_from_zero() {
        assert_eq!(format_fixed(Decimal::new(123456785, 9)), "0.12345679");
        assert_eq!(format_fixed(Decimal::new(-123456785, 9)), "-0.12345679");
        assert_eq!(format_fixed(Decimal::new(123456784, 9)), "0.12345678");
    }

    #[test]
    fn test_parse_required() {
        assert_eq!(parse_required(" 2.5 "), Ok(Decimal::new(25, 1)));
        assert_eq!(parse_required("n/a"), Err(Unparsed::NotANumber));
        assert_eq!(parse_required(""), Err(Unparsed::NotANumber));
        let huge = format!("1{}", "0".repeat(29));
        assert!(is_decimal_literal(&huge));
        assert_eq!(parse_required(&huge), Err(Unparsed::OutOfRange));
    }

    #[test]
    fn test_format_fixed_large_values_keep_eight_places() {
        let value = Decimal::from_str("1000000000000000000000").unwrap();
        assert_eq!(format_fixed(value), "1000000000000000000000.00000000");
        let value = Decimal::from_str("-790000000000000000000.5").unwrap();
        assert_eq!(format_fixed(value), "-790000000000000000000.50000000");
    }

    #[test]
    fn test_format_fixed_negative_zero() {
        assert_eq!(format_fixed(Decimal::new(-1, 10)), "0.00000000");
    }
}
