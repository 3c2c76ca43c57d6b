use crate::error::{RollupError, RollupResult};
use crate::model::{format_fixed, parse_required, Percent, Unparsed};
use rust_decimal::Decimal;

/// Applies a percentage adjustment to a single decimal string.
///
/// With no percentage the value is returned exactly as given. Otherwise the result is
/// `value * percent / 100`, computed without binary floating point and rendered with exactly
/// eight fractional digits.
///
/// # Errors
/// - `InvalidNumericCell` if `value` is not a decimal number, whether or not a percentage is
///   given.
/// - `Overflow` if `value` or the product does not fit in a `Decimal`.
///
/// ```
/// # use csv_rollup::engine::apply_adjustment;
/// # use csv_rollup::model::Percent;
/// let half = Percent::parse_input("50").unwrap();
/// assert_eq!(apply_adjustment("150", half).unwrap(), "75.00000000");
/// assert_eq!(apply_adjustment("150", None).unwrap(), "150");
/// assert!(apply_adjustment("n/a", None).is_err());
/// ```
pub fn apply_adjustment(value: &str, percent: Option<Percent>) -> RollupResult<String> {
    let parsed = parse_required(value).map_err(|e| match e {
        Unparsed::NotANumber => RollupError::invalid_value(value),
        Unparsed::OutOfRange => RollupError::Overflow(value.into()),
    })?;
    match percent {
        None => Ok(value.to_string()),
        Some(p) => {
            let adjusted = p
                .apply(parsed)
                .ok_or_else(|| RollupError::Overflow(value.into()))?;
            Ok(format_fixed(adjusted))
        }
    }
}

/// Applies the adjustment for `column` to an aggregated `total`. This is the step the reducer
/// runs once per group, after summing.
pub(crate) fn adjust_total(
    column: &str,
    total: Decimal,
    percent: Option<Percent>,
) -> RollupResult<Decimal> {
    match percent {
        None => Ok(total),
        Some(p) => p
            .apply(total)
            .ok_or_else(|| RollupError::Overflow(column.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn pct(s: &str) -> Option<Percent> {
        Percent::parse_input(s).unwrap()
    }

    #[test]
    fn test_passthrough_without_percent() {
        for v in ["0", "-1", "3.", "12.345678912", "007", "1e3"] {
            assert_eq!(apply_adjustment(v, None).unwrap(), v);
        }
    }

    #[test]
    fn test_zero_and_nan_percent_pass_through() {
        assert_eq!(apply_adjustment("42.1", pct("0")).unwrap(), "42.1");
        assert_eq!(apply_adjustment("42.1", pct("NaN")).unwrap(), "42.1");
    }

    #[test]
    fn test_fractional_percent() {
        assert_eq!(apply_adjustment("200", pct("12.5")).unwrap(), "25.00000000");
        assert_eq!(apply_adjustment("0.1", pct("33.3")).unwrap(), "0.03330000");
    }

    #[test]
    fn test_negative_percent() {
        assert_eq!(apply_adjustment("80", pct("-25")).unwrap(), "-20.00000000");
    }

    #[test]
    fn test_rounds_to_eight_places() {
        assert_eq!(apply_adjustment("1", pct("0.000000005")).unwrap(), "0.00000000");
        assert_eq!(apply_adjustment("10", pct("0.0000001")).unwrap(), "0.00000001");
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        assert_eq!(
            apply_adjustment("", pct("10")).unwrap_err(),
            RollupError::invalid_value("")
        );
        assert_eq!(
            apply_adjustment("abc", None).unwrap_err(),
            RollupError::InvalidNumericCell {
                column: None,
                row: None,
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn test_out_of_range_value_is_overflow() {
        let huge = format!("1{}", "0".repeat(29));
        assert_eq!(
            apply_adjustment(&huge, pct("10")).unwrap_err(),
            RollupError::Overflow(huge.clone())
        );
    }

    #[test]
    fn test_adjust_total() {
        let total = Decimal::from_str("150").unwrap();
        assert_eq!(
            adjust_total("Qty", total, pct("50")).unwrap(),
            Decimal::from_str("75").unwrap()
        );
        assert_eq!(adjust_total("Qty", total, None).unwrap(), total);
        assert_eq!(
            adjust_total("Qty", Decimal::MAX, pct("200")).unwrap_err(),
            RollupError::Overflow("Qty".into())
        );
    }
}
