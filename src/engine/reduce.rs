use crate::engine::adjust::adjust_total;
use crate::engine::group::{group_by, normalize_date_keys, Group};
use crate::error::{RollupError, RollupResult};
use crate::model::{
    format_fixed, parse_required, Adjustments, Classification, Dataset, Mapping, Percent, Row,
    Unparsed,
};
use rust_decimal::Decimal;
use tracing::debug;

/// A numeric column the reducer sums: its position, its name and its adjustment.
#[derive(Debug, Clone)]
pub struct NumericColumn<'a> {
    index: usize,
    name: &'a str,
    percent: Option<Percent>,
}

/// Collects the numeric columns of `columns` together with their registered adjustments.
pub fn numeric_columns<'a>(
    columns: &'a Mapping,
    classification: &Classification,
    adjustments: &Adjustments,
) -> Vec<NumericColumn<'a>> {
    classification
        .numeric_indices()
        .into_iter()
        .filter_map(|index| {
            let name = columns.headers().get(index)?.as_ref();
            Some(NumericColumn {
                index,
                name,
                percent: adjustments.get(name),
            })
        })
        .collect()
}

/// Folds one group into a single row.
///
/// The group's first row is the template: every non-numeric cell is copied from it. Each numeric
/// column is summed across all rows of the group, the column's adjustment is applied once to the
/// total, and the result is written with eight fractional digits.
///
/// # Errors
/// - `InvalidNumericCell` if any cell of a numeric column does not parse as a decimal.
/// - `Overflow` if a cell, a sum or an adjustment leaves the `Decimal` range.
/// - `RowSetMismatch` if `group` or `numeric` refer to rows or columns that `rows` lacks.
pub fn reduce(
    rows: &[Row],
    group: &Group,
    numeric: &[NumericColumn<'_>],
) -> RollupResult<Row> {
    let Some(&first) = group.members().first() else {
        return Ok(Row::new());
    };
    let mut output = row_at(rows, first)?.clone();

    for column in numeric {
        let mut total = Decimal::ZERO;
        for &row_ix in group.members() {
            let value = row_at(rows, row_ix)?
                .get(column.index)
                .ok_or_else(|| past_the_end(column, row_ix))?;
            let parsed = parse_required(value).map_err(|e| match e {
                Unparsed::NotANumber => RollupError::invalid_cell(column.name, row_ix, value),
                Unparsed::OutOfRange => RollupError::Overflow(column.name.to_string()),
            })?;
            total = total
                .checked_add(parsed)
                .ok_or_else(|| RollupError::Overflow(column.name.to_string()))?;
        }
        let adjusted = adjust_total(column.name, total, column.percent)?;
        let cell = output
            .get_mut(column.index)
            .ok_or_else(|| past_the_end(column, first))?;
        *cell = format_fixed(adjusted);
    }

    Ok(output)
}

fn past_the_end(column: &NumericColumn<'_>, row_ix: usize) -> RollupError {
    RollupError::RowSetMismatch(format!(
        "column '{}' is at position {}, past the end of row {row_ix}",
        column.name, column.index
    ))
}

fn row_at(rows: &[Row], ix: usize) -> RollupResult<&Row> {
    rows.get(ix).ok_or_else(|| {
        RollupError::RowSetMismatch(format!(
            "row {ix} requested from a set of {} row(s)",
            rows.len()
        ))
    })
}

/// Runs the whole transformation over a dataset: date key normalization, grouping by the
/// `key_columns` positions, and one reduced row per group, in group order.
///
/// # Errors
/// - Propagates the errors of [`reduce`]; nothing is coerced to zero.
pub fn aggregate(
    dataset: &Dataset,
    classification: &Classification,
    key_columns: &[usize],
    adjustments: &Adjustments,
) -> RollupResult<Vec<Row>> {
    let rows = normalize_date_keys(dataset.rows(), key_columns, classification);
    let groups = group_by(&rows, key_columns);
    let numeric = numeric_columns(dataset.columns(), classification, adjustments);

    let output = groups
        .iter()
        .map(|group| reduce(&rows, group, &numeric))
        .collect::<RollupResult<Vec<Row>>>()?;

    debug!(
        "Aggregated {} row(s) into {} row(s) over {} numeric column(s)",
        rows.len(),
        output.len(),
        numeric.len()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify;
    use crate::model::{ColumnInfo, ColumnKind};

    fn dataset(data: &[&[&str]]) -> Dataset {
        Dataset::new(data.iter().map(|r| r.iter().copied())).unwrap()
    }

    fn run(
        data: &[&[&str]],
        keys: &[&str],
        adjustments: &[(&str, &str)],
    ) -> RollupResult<Vec<Row>> {
        let dataset = dataset(data);
        let names: Vec<&str> = dataset.columns().names().collect();
        let classification = classify(&names, dataset.rows());
        let key_columns: Vec<usize> = keys
            .iter()
            .map(|k| dataset.columns().index_of(k).unwrap())
            .collect();
        let mut adj = Adjustments::new();
        for (column, input) in adjustments {
            adj.set(*column, Percent::parse_input(input).unwrap());
        }
        aggregate(&dataset, &classification, &key_columns, &adj)
    }

    #[test]
    fn test_sum_is_exact() {
        let out = run(&[&["Qty"], &["0.1"], &["0.2"], &["0.3"]], &[], &[]).unwrap();
        assert_eq!(out, vec![vec!["0.60000000".to_string()]]);
    }

    #[test]
    fn test_adjustment_applies_to_group_total() {
        let out = run(
            &[&["Region", "Qty"], &["N", "100"], &["N", "50"]],
            &["Region"],
            &[("Qty", "50")],
        )
        .unwrap();
        assert_eq!(out, vec![vec!["N".to_string(), "75.00000000".to_string()]]);
    }

    #[test]
    fn test_adjustment_is_applied_once_not_per_row() {
        // Per-row rounding at eight places would give 3 * 0.00000000 = 0; the total is adjusted
        // once instead.
        let out = run(
            &[&["Qty"], &["0.000000004"], &["0.000000004"], &["0.000000004"]],
            &[],
            &[("Qty", "100")],
        )
        .unwrap();
        assert_eq!(out[0][0], "0.00000001");
    }

    #[test]
    fn test_template_row_wins() {
        let out = run(
            &[
                &["Region", "Rep", "Qty"],
                &["N", "alice", "1"],
                &["N", "bob", "2"],
                &["S", "carol", "4"],
            ],
            &["Region"],
            &[],
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                vec!["N".to_string(), "alice".to_string(), "3.00000000".to_string()],
                vec!["S".to_string(), "carol".to_string(), "4.00000000".to_string()],
            ]
        );
    }

    #[test]
    fn test_date_key_is_truncated_in_output() {
        let out = run(
            &[
                &["When", "Qty"],
                &["2024-01-01 08:00:00", "1"],
                &["2024-01-01 23:00:00", "2"],
                &["2024-01-02 00:00:01", "3"],
            ],
            &["When"],
            &[],
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                vec!["2024-01-01 00:00:00".to_string(), "3.00000000".to_string()],
                vec!["2024-01-02 00:00:00".to_string(), "3.00000000".to_string()],
            ]
        );
    }

    #[test]
    fn test_no_key_columns_yields_one_row() {
        let out = run(
            &[&["Region", "Qty"], &["N", "1"], &["S", "2"], &["E", "3"]],
            &[],
            &[],
        )
        .unwrap();
        assert_eq!(out, vec![vec!["N".to_string(), "6.00000000".to_string()]]);
    }

    #[test]
    fn test_unique_key_is_identity_modulo_formatting() {
        let out = run(
            &[
                &["Id", "Region", "Qty"],
                &["a", "N", "1.5"],
                &["b", "S", "-2"],
                &["c", "N", "3"],
            ],
            &["Id"],
            &[],
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                vec!["a".to_string(), "N".to_string(), "1.50000000".to_string()],
                vec!["b".to_string(), "S".to_string(), "-2.00000000".to_string()],
                vec!["c".to_string(), "N".to_string(), "3.00000000".to_string()],
            ]
        );
    }

    #[test]
    fn test_blank_numeric_cell_is_an_error() {
        let err = run(&[&["Region", "Qty"], &["N", "1"], &["S", ""]], &[], &[]).unwrap_err();
        assert_eq!(err, RollupError::invalid_cell("Qty", 1, ""));
    }

    #[test]
    fn test_non_ascii_digits_are_not_numeric() {
        let out = run(&[&["Code", "Qty"], &["١٢", "1"], &["x", "2"]], &[], &[]).unwrap();
        assert_eq!(out, vec![vec!["١٢".to_string(), "3.00000000".to_string()]]);
    }

    #[test]
    fn test_large_total_keeps_eight_places() {
        let out = run(&[&["Qty"], &["1000000000000000000000"]], &[], &[]).unwrap();
        assert_eq!(out[0][0], "1000000000000000000000.00000000");
    }

    #[test]
    fn test_out_of_range_cell_is_overflow() {
        let huge = format!("1{}", "0".repeat(29));
        let err = run(&[&["Qty"], &[huge.as_str()]], &[], &[]).unwrap_err();
        assert_eq!(err, RollupError::Overflow("Qty".into()));
    }

    #[test]
    fn test_reduce_rejects_foreign_row_set() {
        let dataset = dataset(&[&["Region", "Qty"], &["N", "1"], &["S", "2"]]);
        let names: Vec<&str> = dataset.columns().names().collect();
        let classification = classify(&names, dataset.rows());
        let numeric = numeric_columns(dataset.columns(), &classification, &Adjustments::new());
        let groups = group_by(dataset.rows(), &[]);

        let err = reduce(&dataset.rows()[..1], &groups[0], &numeric).unwrap_err();
        assert!(matches!(err, RollupError::RowSetMismatch(_)));

        let narrow = vec![vec!["N".to_string()], vec!["S".to_string()]];
        let err = reduce(&narrow, &groups[0], &numeric).unwrap_err();
        assert!(matches!(err, RollupError::RowSetMismatch(_)));
    }

    #[test]
    fn test_empty_dataset() {
        let out = run(&[&["Region", "Qty"]], &["Region"], &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_only_classified_numeric_columns_are_summed() {
        let dataset = dataset(&[&["Code", "Qty"], &["1", "2"], &["1", "3"]]);
        let classification = Classification::new(vec![
            ColumnInfo::new("Code", ColumnKind::Categorical),
            ColumnInfo::new("Qty", ColumnKind::Numeric),
        ]);
        let out = aggregate(&dataset, &classification, &[0], &Adjustments::new()).unwrap();
        assert_eq!(out, vec![vec!["1".to_string(), "5.00000000".to_string()]]);
    }
}
