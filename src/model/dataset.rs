use crate::error::RollupResult;
use crate::model::mapping::Mapping;
use serde::Serialize;
use tracing::{trace, warn};

/// One data row: string cells aligned positionally with the header.
pub type Row = Vec<String>;

/// The contents of a CSV file: a unique header and the rows that match it in length.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Dataset {
    columns: Mapping,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a `Dataset` from raw records. The first record is the header; it may be absent, in
    /// which case the dataset is empty.
    ///
    /// Rows whose length differs from the header's are malformed. They are skipped with a
    /// warning so that every remaining row lines up with the header.
    ///
    /// # Errors
    /// - Returns `MalformedFile` if the header contains a duplicate name.
    pub fn new<S, R>(records: impl IntoIterator<Item = R>) -> RollupResult<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
    {
        let mut records = records.into_iter();
        let columns = match records.next() {
            Some(header_row) => Mapping::new(header_row)?,
            None => return Ok(Self::default()),
        };

        let len = columns.len();
        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for (row_ix, record) in records.enumerate() {
            let values: Row = record.into_iter().map(|s| s.into()).collect();
            if values.len() != len {
                trace!(
                    "Skipping row {} with {} cells, expected {len}",
                    row_ix + 2,
                    values.len()
                );
                skipped += 1;
                continue;
            }
            rows.push(values);
        }

        if skipped > 0 {
            warn!("Skipped {skipped} malformed row(s) that did not match the header length of {len}");
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &Mapping {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
