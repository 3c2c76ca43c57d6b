//! Job file handling.
//!
//! A job file is a JSON document that records the choices a user would otherwise make by hand:
//! which columns to group by, which adjustments to apply and where to write the output. For
//! example:
//!
//! ```json
//! {
//!   "group_by": ["When", "Region"],
//!   "adjustments": { "Price": 50, "Qty": "12.5" },
//!   "out_dir": "out"
//! }
//! ```
//!
//! All fields are optional. A relative `out_dir` is resolved against the directory that holds the
//! job file.

use crate::model::PercentInput;
use crate::{utils, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Job {
    /// Columns to group by, in selection order.
    group_by: Vec<String>,

    /// Percentage adjustment per numeric column.
    adjustments: BTreeMap<String, PercentInput>,

    /// Where to write the output file.
    out_dir: Option<PathBuf>,
}

impl Job {
    /// Loads a job file.
    pub async fn load(path: &Path) -> Result<Self> {
        let mut job: Job = utils::deserialize(path)
            .await
            .with_context(|| format!("Unable to load the job file '{}'", path.display()))?;
        if let (Some(out_dir), Some(parent)) = (&job.out_dir, path.parent()) {
            if out_dir.is_relative() {
                job.out_dir = Some(parent.join(out_dir));
            }
        }
        debug!(
            "Loaded job with {} group-by column(s) and {} adjustment(s)",
            job.group_by.len(),
            job.adjustments.len()
        );
        Ok(job)
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn adjustments(&self) -> &BTreeMap<String, PercentInput> {
        &self.adjustments
    }

    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }
}
