//! Error types.
//!
//! Application code propagates `anyhow::Error` through the crate-level `Result`. The engine raises
//! typed [`RollupError`] values so that callers can match on the conditions that matter, such as
//! a numeric cell that does not parse. These convert into `anyhow::Error` with `?`.

use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Conditions raised by the classification, grouping and aggregation engine and by the session.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RollupError {
    /// The text could not be read as comma-delimited data with a unique header row.
    #[error("Malformed CSV file: {0}")]
    MalformedFile(String),

    /// A value that must be numeric does not hold a decimal number. `column` and `row` locate
    /// the cell when it came from a dataset; `row` is the zero-based index of the data row, not
    /// counting the header. A value handed to `apply_adjustment` on its own has neither.
    #[error("Invalid numeric value '{value}'{}", cell_position(.column, .row))]
    InvalidNumericCell {
        column: Option<String>,
        row: Option<usize>,
        value: String,
    },

    /// An adjustment percentage that is neither blank, `NaN`, nor a decimal number.
    #[error("Invalid adjustment percentage '{0}'")]
    InvalidPercentage(String),

    /// A column name that is not present in the loaded header.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// An adjustment was requested for a column that was not classified as numeric.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    /// The session has no dataset loaded.
    #[error("No CSV file has been loaded")]
    NotLoaded,

    /// A value, a sum or an adjustment left the range of the decimal type. Holds the column
    /// name, or the value itself when there is no column.
    #[error("Decimal overflow in '{0}'")]
    Overflow(String),

    /// A group refers to a row or a column that the row set handed to `reduce` does not have.
    #[error("Group does not match the row set: {0}")]
    RowSetMismatch(String),
}

impl RollupError {
    /// An `InvalidNumericCell` for the cell at `row` of `column`.
    pub fn invalid_cell(column: impl Into<String>, row: usize, value: impl Into<String>) -> Self {
        RollupError::InvalidNumericCell {
            column: Some(column.into()),
            row: Some(row),
            value: value.into(),
        }
    }

    /// An `InvalidNumericCell` for a value that did not come from a dataset.
    pub fn invalid_value(value: impl Into<String>) -> Self {
        RollupError::InvalidNumericCell {
            column: None,
            row: None,
            value: value.into(),
        }
    }
}

fn cell_position(column: &Option<String>, row: &Option<usize>) -> String {
    match (column, row) {
        (Some(column), Some(row)) => format!(" in column '{column}' at data row {row}"),
        (Some(column), None) => format!(" in column '{column}'"),
        (None, Some(row)) => format!(" at data row {row}"),
        (None, None) => String::new(),
    }
}

/// Result type for engine operations.
pub type RollupResult<T> = std::result::Result<T, RollupError>;
