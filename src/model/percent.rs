//! Percentage adjustments for numeric columns.

use crate::error::{RollupError, RollupResult};
use crate::model::numeric::parse_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// A non-zero percentage. An aggregated total `v` becomes `v * percent / 100`, so `50` halves
/// the total and `100` leaves it as it is.
///
/// Zero is not representable: a zero (or blank, or `NaN`) entry means "no adjustment" and is
/// modelled as the absence of a `Percent`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Percent(Decimal);

impl Percent {
    /// Returns `None` for zero.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_zero() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Interprets the text a user typed into an adjustment field.
    ///
    /// Blank input, `NaN` and any spelling of zero mean "no adjustment" and yield `Ok(None)`.
    ///
    /// # Errors
    /// - Returns `InvalidPercentage` for any other text that is not a decimal number.
    pub fn parse_input(input: &str) -> RollupResult<Option<Self>> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        match parse_decimal(trimmed) {
            Some(value) => Ok(Self::new(value)),
            None => Err(RollupError::InvalidPercentage(input.to_string())),
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Computes `value * percent / 100`. Returns `None` if the result does not fit in a
    /// `Decimal`.
    pub fn apply(&self, value: Decimal) -> Option<Decimal> {
        value
            .checked_mul(self.0)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

/// The percentage registered for each numeric column. Columns without an entry are not
/// adjusted.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Adjustments(BTreeMap<String, Percent>);

impl Adjustments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `percent` for `column`, or removes the entry when `percent` is `None`.
    pub fn set(&mut self, column: impl Into<String>, percent: Option<Percent>) {
        let column = column.into();
        match percent {
            Some(p) => {
                let _ = self.0.insert(column, p);
            }
            None => {
                let _ = self.0.remove(&column);
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<Percent> {
        self.0.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Percent)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// An adjustment as written in a job file: either a JSON number or a string, e.g. `10`,
/// `-2.5` or `"12.75"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PercentInput {
    Number(f64),
    Text(String),
}

impl PercentInput {
    pub fn parse(&self) -> RollupResult<Option<Percent>> {
        match self {
            PercentInput::Number(n) if n.is_finite() => Percent::parse_input(&n.to_string()),
            PercentInput::Number(_) => Ok(None),
            PercentInput::Text(s) => Percent::parse_input(s),
        }
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let input = PercentInput::deserialize(deserializer)?;
        input
            .parse()
            .map_err(serde::de::Error::custom)?
            .ok_or_else(|| serde::de::Error::custom("a percentage of zero is not an adjustment"))
    }
}
