//! The `classify` command: report the inferred kind of every column.

use crate::args::{ClassifyArgs, OutputFormat};
use crate::commands::Out;
use crate::error::RollupError;
use crate::model::Classification;
use crate::session::Session;
use crate::source::{FileSource, Source};
use crate::{utils, Result};
use anyhow::Context;

/// Loads `args.file()`, writes its classification to stdout in the requested format and returns
/// it.
pub async fn classify(args: &ClassifyArgs) -> Result<Out<Classification>> {
    let source = FileSource::new(args.file());
    let mut session = Session::new();
    session.load(&source).await?;
    let classification = session
        .loaded()
        .ok_or(RollupError::NotLoaded)?
        .classification()
        .clone();

    let rendered = match args.format() {
        OutputFormat::Table => render_table(&classification),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&classification)
                .context("Unable to serialize the classification")?;
            json.push('\n');
            json
        }
    };
    utils::write_stdout(rendered).await?;

    let message = format!(
        "Classified {} column(s) in '{}': {} numeric, {} date",
        classification.columns().len(),
        source.file_name(),
        classification.numeric_columns().len(),
        classification.date_columns().len()
    );
    Ok(Out::new(message, classification))
}

/// Renders a two-column text table of column names and kinds.
pub fn render_table(classification: &Classification) -> String {
    const NAME: &str = "column";
    let width = classification
        .columns()
        .iter()
        .map(|c| c.name().chars().count())
        .max()
        .unwrap_or_default()
        .max(NAME.len());

    let mut table = format!("{NAME:<width$}  kind\n");
    for column in classification.columns() {
        table.push_str(&format!("{:<width$}  {}\n", column.name(), column.kind()));
    }
    table
}
