//! The `export` command: group a CSV file, roll up its numeric columns and write the result.

use crate::args::ExportArgs;
use crate::commands::Out;
use crate::config::Job;
use crate::error::RollupError;
use crate::model::{Adjustments, GroupSelection};
use crate::session::Session;
use crate::source::FileSource;
use crate::{utils, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What an export did.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    input: PathBuf,
    /// The written file, or `None` when the CSV went to stdout.
    output: Option<PathBuf>,
    file_name: String,
    group_by: GroupSelection,
    adjustments: Adjustments,
    input_rows: usize,
    output_rows: usize,
}

impl ExportSummary {
    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn group_by(&self) -> &GroupSelection {
        &self.group_by
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn input_rows(&self) -> usize {
        self.input_rows
    }

    pub fn output_rows(&self) -> usize {
        self.output_rows
    }
}

/// Loads `args.file()`, applies the job file and then the command line choices, and writes the
/// grouped output.
pub async fn export(args: &ExportArgs) -> Result<Out<ExportSummary>> {
    let job = match args.job() {
        Some(path) => Job::load(path).await?,
        None => Job::default(),
    };

    let source = FileSource::new(args.file());
    let mut session = Session::new();
    session.load(&source).await?;

    for (column, input) in job.adjustments() {
        let percent = input.parse().context("Invalid adjustment in the job file")?;
        session.set_percent(column, percent)?;
    }
    for column in job.group_by() {
        let _ = session.toggle_group_by(column)?;
    }
    for adjust in args.adjust() {
        let percent = session.set_adjustment(adjust.column(), adjust.percent())?;
        debug!(
            "Adjustment for '{}': {}",
            adjust.column(),
            percent.map(|p| p.to_string()).unwrap_or_else(|| "none".into())
        );
    }
    for column in args.group_by() {
        let _ = session.toggle_group_by(column)?;
    }

    let export = session.export()?;
    let loaded = session.loaded().ok_or(RollupError::NotLoaded)?;

    let output = if args.stdout() {
        utils::write_stdout(export.csv()).await?;
        None
    } else {
        let dir = match args.out_dir().or(job.out_dir()) {
            Some(dir) => dir.to_path_buf(),
            None => input_dir(args.file()),
        };
        utils::make_dir(&dir).await?;
        let path = dir.join(export.file_name());
        utils::write(&path, export.csv()).await?;
        info!("Wrote {}", path.display());
        Some(path)
    };

    let message = format!(
        "Rolled up {} row(s) into {} row(s) as '{}'",
        export.input_rows(),
        export.output_rows(),
        export.file_name()
    );
    let summary = ExportSummary {
        input: args.file().to_path_buf(),
        output,
        file_name: export.file_name().to_string(),
        group_by: loaded.selection().clone(),
        adjustments: loaded.adjustments().clone(),
        input_rows: export.input_rows(),
        output_rows: export.output_rows(),
    };
    Ok(Out::new(message, summary))
}

fn input_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
