//! Reading and writing comma-separated text.

use crate::error::{RollupError, RollupResult};
use crate::model::{Dataset, Row};
use crate::Result;
use anyhow::Context;
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::trace;

/// Parses CSV text into a [`Dataset`]. The first record is the header. Records may have any
/// number of fields; those that do not match the header length are dropped by `Dataset::new`.
/// A leading byte-order mark is ignored. Empty text yields an empty dataset.
///
/// # Errors
/// - `MalformedFile` if the text is not readable as CSV or the header has duplicate names.
pub fn parse(text: &str) -> RollupResult<Dataset> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<Row> = Vec::new();
    for (ix, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            RollupError::MalformedFile(format!("Unable to read record {}: {e}", ix + 1))
        })?;
        records.push(record.iter().map(String::from).collect());
    }
    trace!("Read {} record(s) including the header", records.len());

    Dataset::new(records)
}

/// Writes `header` followed by `rows` as CSV text. Fields are quoted only when necessary and
/// every record ends with `\n`.
pub fn write<S>(header: &[S], rows: &[Row]) -> Result<String>
where
    S: AsRef<str>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(header.iter().map(|h| h.as_ref()))
        .context("Unable to write the CSV header")?;
    for row in rows {
        writer
            .write_record(row)
            .context("Unable to write a CSV record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush the CSV writer: {e}"))?;
    String::from_utf8(bytes).context("The CSV output is not valid UTF-8")
}
