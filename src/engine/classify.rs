use crate::model::{
    is_decimal_literal, is_timestamp, Classification, ColumnInfo, ColumnKind, Row,
};
use tracing::debug;

/// Infers the kind of every column from the raw cell values.
///
/// - A column is numeric if **any** row holds a decimal literal in it. Blank or non-numeric cells
///   elsewhere in the column do not disqualify it.
/// - A column is a date column if **every** row holds a parsable date in it. A single blank or
///   unparsable cell disqualifies it. With no rows at all, every column qualifies.
///
/// Both rules are evaluated independently for each column.
pub fn classify<S>(columns: &[S], rows: &[Row]) -> Classification
where
    S: AsRef<str>,
{
    let infos: Vec<ColumnInfo> = columns
        .iter()
        .enumerate()
        .map(|(ix, name)| {
            let cells = || rows.iter().map(move |row| cell(row, ix));
            let numeric = cells().any(is_decimal_literal);
            let date = cells().all(is_timestamp);
            ColumnInfo::new(name.as_ref(), ColumnKind::from_rules(numeric, date))
        })
        .collect();

    let classification = Classification::new(infos);
    debug!(
        "Classified {} column(s): numeric {:?}, date {:?}",
        columns.len(),
        classification.numeric_columns(),
        classification.date_columns()
    );
    classification
}

fn cell(row: &Row, ix: usize) -> &str {
    row.get(ix).map(String::as_str).unwrap_or_default()
}
