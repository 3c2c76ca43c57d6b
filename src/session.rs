//! The `Session` holds one loaded CSV file and everything derived from it.
//!
//! A session is either `Empty` or `Loaded`. Loading a new file first clears the session, then
//! installs the new dataset together with its classification, an empty set of adjustments and an
//! empty group-by selection in one assignment. Exporting computes output from the loaded state
//! without changing it, so it can be repeated.
//!
//! Loads are identified by a [`LoadTicket`]. Only the newest ticket may install its result, so
//! when a second file is chosen while the first is still being read, the first read is ignored
//! whenever it completes.

use crate::engine::{aggregate, classify};
use crate::error::{RollupError, RollupResult};
use crate::model::{Adjustments, Classification, Dataset, GroupSelection, Percent};
use crate::source::Source;
use crate::{codec, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The coarse state of a [`Session`].
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Empty,
    Loaded,
}

serde_plain::derive_display_from_serialize!(SessionState);
serde_plain::derive_fromstr_from_deserialize!(SessionState);

/// Identifies one call to [`Session::begin_load`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LoadTicket(u64);

/// A loaded file and the state derived from it. The classification always belongs to the dataset
/// stored next to it.
#[derive(Debug, Clone)]
pub struct Loaded {
    file_name: String,
    dataset: Dataset,
    classification: Classification,
    adjustments: Adjustments,
    selection: GroupSelection,
}

impl Loaded {
    fn new(file_name: String, dataset: Dataset) -> Self {
        let names: Vec<&str> = dataset.columns().names().collect();
        let classification = classify(&names, dataset.rows());
        Self {
            file_name,
            dataset,
            classification,
            adjustments: Adjustments::new(),
            selection: GroupSelection::new(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn selection(&self) -> &GroupSelection {
        &self.selection
    }

    /// The name offered for the output file: `{base}_grouped_by_{columns joined by "_"}.csv`,
    /// where `base` is the uploaded file name up to its first `.`.
    pub fn output_file_name(&self) -> String {
        let base = self.file_name.split('.').next().unwrap_or_default();
        format!(
            "{base}_grouped_by_{}.csv",
            self.selection.columns().join("_")
        )
    }

    fn require_numeric(&self, column: &str) -> RollupResult<()> {
        let ix = self.dataset.columns().require(column)?;
        if self.classification.kind(ix).is_numeric() {
            Ok(())
        } else {
            Err(RollupError::NotNumeric(column.to_string()))
        }
    }
}

/// The result of an export: the output file name and its CSV text.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Export {
    file_name: String,
    #[serde(skip)]
    csv: String,
    input_rows: usize,
    output_rows: usize,
}

impl Export {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn csv(&self) -> &str {
        &self.csv
    }

    pub fn input_rows(&self) -> usize {
        self.input_rows
    }

    pub fn output_rows(&self) -> usize {
        self.output_rows
    }
}

#[derive(Debug, Default)]
pub struct Session {
    loaded: Option<Loaded>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match self.loaded {
            None => SessionState::Empty,
            Some(_) => SessionState::Loaded,
        }
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        self.loaded.as_ref()
    }

    /// Starts a new load: the session is cleared and a ticket newer than every earlier one is
    /// returned.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loaded = None;
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Completes the load identified by `ticket` with the text that was read.
    ///
    /// Returns `Ok(false)` without touching the session if a newer load has been started since
    /// `ticket` was issued.
    ///
    /// # Errors
    /// - `MalformedFile` if `text` cannot be parsed. The session stays empty.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        file_name: impl Into<String>,
        text: &str,
    ) -> RollupResult<bool> {
        let file_name = file_name.into();
        if ticket.0 != self.generation {
            debug!("Ignoring superseded load of '{file_name}'");
            return Ok(false);
        }
        let dataset = codec::parse(text)?;
        let loaded = Loaded::new(file_name, dataset);
        info!(
            "Loaded '{}' with {} column(s) and {} row(s)",
            loaded.file_name,
            loaded.dataset.columns().len(),
            loaded.dataset.rows().len()
        );
        self.loaded = Some(loaded);
        Ok(true)
    }

    /// Reads `source` to completion and loads its text.
    pub async fn load(&mut self, source: &dyn Source) -> Result<()> {
        let ticket = self.begin_load();
        let text = source.read().await?;
        let _ = self.finish_load(ticket, source.file_name(), &text)?;
        Ok(())
    }

    /// Registers the adjustment typed for a numeric column. Blank, zero and `NaN` input remove
    /// the column's adjustment. Returns the adjustment now in effect.
    pub fn set_adjustment(&mut self, column: &str, input: &str) -> RollupResult<Option<Percent>> {
        let percent = Percent::parse_input(input)?;
        self.set_percent(column, percent)?;
        Ok(percent)
    }

    /// Registers `percent` for a numeric column, or removes its adjustment when `None`.
    pub fn set_percent(&mut self, column: &str, percent: Option<Percent>) -> RollupResult<()> {
        let loaded = self.loaded.as_mut().ok_or(RollupError::NotLoaded)?;
        loaded.require_numeric(column)?;
        loaded.adjustments.set(column, percent);
        Ok(())
    }

    /// Adds `column` to the group-by selection, or removes it if it is already selected.
    /// Returns true if the column is selected afterwards.
    pub fn toggle_group_by(&mut self, column: &str) -> RollupResult<bool> {
        let loaded = self.loaded.as_mut().ok_or(RollupError::NotLoaded)?;
        let _ = loaded.dataset.columns().require(column)?;
        Ok(loaded.selection.toggle(column))
    }

    /// Groups, aggregates and serializes the loaded file with the current adjustments and
    /// selection. The session is left as it was.
    ///
    /// # Errors
    /// - `NotLoaded` if no file is loaded.
    /// - `InvalidNumericCell` or `Overflow` from aggregation.
    pub fn export(&self) -> Result<Export> {
        let loaded = self.loaded.as_ref().ok_or(RollupError::NotLoaded)?;
        let columns = loaded.dataset.columns();
        let key_columns = loaded
            .selection
            .columns()
            .iter()
            .map(|c| columns.require(c))
            .collect::<RollupResult<Vec<usize>>>()?;

        let rows = aggregate(
            &loaded.dataset,
            &loaded.classification,
            &key_columns,
            &loaded.adjustments,
        )?;
        let csv = codec::write(columns.headers(), &rows)?;

        Ok(Export {
            file_name: loaded.output_file_name(),
            csv,
            input_rows: loaded.dataset.rows().len(),
            output_rows: rows.len(),
        })
    }
}
