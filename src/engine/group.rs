//! Partitioning of rows into groups by a composite key.
//!
//! ```text
//! Day                  Region  Qty         key                        group
//! 2024-01-01 08:00:00  North   10    →     (2024-01-01 00:00:00,N)  → 0
//! 2024-01-01 23:00:00  North   5     →     (2024-01-01 00:00:00,N)  → 0
//! 2024-01-02 00:00:01  North   7     →     (2024-01-02 00:00:00,N)  → 1
//! ```
//!
//! Date key columns are truncated to their day by [`normalize_date_keys`], which returns a new
//! row set. [`group_by`] then works on those rows without modifying them.

use crate::model::{start_of_day, Classification, Row};
use std::collections::HashMap;
use tracing::debug;

/// Rows that share a composite key. `members` are positions in the row set that was grouped, in
/// input order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Group {
    key: Vec<String>,
    members: Vec<usize>,
}

impl Group {
    pub fn key(&self) -> &[String] {
        &self.key
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Returns a copy of `rows` in which every key column that is classified as a date holds the
/// start of its day, rendered as `YYYY-MM-DD HH:MM:SS`. Other cells are unchanged.
///
/// Date columns parse in every row by construction; a cell that does not is left as is.
pub fn normalize_date_keys(
    rows: &[Row],
    key_columns: &[usize],
    classification: &Classification,
) -> Vec<Row> {
    let date_keys: Vec<usize> = key_columns
        .iter()
        .copied()
        .filter(|&ix| classification.kind(ix).is_date())
        .collect();

    if date_keys.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            for &ix in &date_keys {
                if let Some(day) = row.get(ix).and_then(|cell| start_of_day(cell)) {
                    row[ix] = day;
                }
            }
            row
        })
        .collect()
}

/// Partitions `rows` by the values found at `key_columns`, taken in the given order.
///
/// Groups are returned in the order their key is first seen. With no key columns every row
/// belongs to one group; with no rows there are no groups.
pub fn group_by(rows: &[Row], key_columns: &[usize]) -> Vec<Group> {
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for (row_ix, row) in rows.iter().enumerate() {
        let key: Vec<String> = key_columns
            .iter()
            .map(|&ix| row.get(ix).cloned().unwrap_or_default())
            .collect();

        let group_ix = *index.entry(key).or_insert_with_key(|key| {
            groups.push(Group {
                key: key.clone(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[group_ix].members.push(row_ix);
    }

    debug!(
        "Grouped {} row(s) by {} key column(s) into {} group(s)",
        rows.len(),
        key_columns.len(),
        groups.len()
    );
    groups
}
