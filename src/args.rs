//! These structs provide the CLI interface for the csv-rollup CLI.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

/// csv-rollup: Group the rows of a CSV file and roll up its numeric columns.
///
/// Columns are classified as numeric, date or categorical by looking at their values. Rows can be
/// grouped by any set of columns; date columns are grouped by calendar day. Numeric columns are
/// summed within each group using exact decimal arithmetic and can be scaled by a percentage.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the detected kind of every column in a CSV file.
    Classify(ClassifyArgs),
    /// Group and roll up a CSV file and write the result.
    ///
    /// The output is named `{base}_grouped_by_{columns}.csv`, where `base` is the input file name
    /// up to its first `.`, and is written next to the input unless --out-dir or --stdout is
    /// given. Options from --job are applied first, then --adjust and --group-by.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

impl Common {
    pub fn new(log_level: LevelFilter) -> Self {
        Self { log_level }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

/// How `classify` prints its result.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// Args for the `csv-rollup classify` command.
#[derive(Debug, Parser, Clone)]
pub struct ClassifyArgs {
    /// The CSV file to classify.
    file: PathBuf,

    /// The output format: table or json.
    #[arg(long, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ClassifyArgs {
    pub fn new(file: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            file: file.into(),
            format,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Args for the `csv-rollup export` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ExportArgs {
    /// The CSV file to roll up.
    file: PathBuf,

    /// A column to group by. Repeat to group by several columns; the order is kept. Naming a
    /// column that is already selected (e.g. by the job file) deselects it.
    #[arg(long = "group-by", value_name = "COL")]
    group_by: Vec<String>,

    /// A percentage adjustment for a numeric column, e.g. `Price=50` halves the Price totals.
    /// A percentage of 0 or an empty value removes the adjustment.
    #[arg(long = "adjust", value_name = "COL=PCT")]
    adjust: Vec<AdjustArg>,

    /// A JSON job file with `group_by`, `adjustments` and `out_dir` entries.
    #[arg(long, value_name = "JOB.json")]
    job: Option<PathBuf>,

    /// The directory to write the output file to. Defaults to the directory of the input file.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print the output CSV to stdout instead of writing a file.
    #[arg(long)]
    stdout: bool,
}

impl ExportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    pub fn with_group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    pub fn with_adjust(mut self, adjust: AdjustArg) -> Self {
        self.adjust.push(adjust);
        self
    }

    pub fn with_job(mut self, job: impl Into<PathBuf>) -> Self {
        self.job = Some(job.into());
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    pub fn with_stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn adjust(&self) -> &[AdjustArg] {
        &self.adjust
    }

    pub fn job(&self) -> Option<&Path> {
        self.job.as_deref()
    }

    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }

    pub fn stdout(&self) -> bool {
        self.stdout
    }
}

/// A `COL=PCT` pair given to `--adjust`. The percentage is kept as typed and validated when it is
/// applied to a loaded file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AdjustArg {
    column: String,
    percent: String,
}

impl AdjustArg {
    pub fn new(column: impl Into<String>, percent: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            percent: percent.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn percent(&self) -> &str {
        &self.percent
    }
}

impl FromStr for AdjustArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split at the last '=' so that column names may contain one.
        match s.rsplit_once('=') {
            Some((column, percent)) if !column.is_empty() => Ok(Self::new(column, percent)),
            _ => Err(format!("Expected COL=PCT but found '{s}'")),
        }
    }
}
