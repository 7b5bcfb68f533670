//! CLI command implementations.

pub mod filter;
pub mod profile;
pub mod serve;
pub mod summarize;

use std::fs;
use std::path::Path;

use colored::Colorize;
use sift::input::ParserConfig;
use sift::{DataSource, Dataset, Explorer, ExplorerConfig, FilterSet, Table};

use crate::cli::{ExploreArgs, FilterArgs};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Widest cell printed in terminal tables.
const MAX_CELL_WIDTH: usize = 24;

/// Build an explorer from the config file and flag overrides.
pub(crate) fn build_explorer(args: &ExploreArgs) -> Result<Explorer, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.categorical_threshold = threshold;
    }
    if let Some(policy) = args.empty_selection {
        config.empty_selection = policy;
    }
    let explorer = Explorer::with_config(config);
    Ok(match args.delimiter {
        Some(delimiter) => explorer.with_parser_config(ParserConfig::with_delimiter(delimiter)),
        None => explorer,
    })
}

/// Load a source given on the command line.
pub(crate) fn load_dataset(
    explorer: &mut Explorer,
    source: &str,
    args: &ExploreArgs,
) -> sift::Result<Dataset> {
    explorer.load(DataSource::from_arg(source), args.label.as_deref())
}

/// Parse filter flags and clamp ranges to the dataset's bounds.
pub(crate) fn filter_set(
    dataset: &Dataset,
    args: &FilterArgs,
) -> Result<FilterSet, Box<dyn std::error::Error>> {
    let filters = args.to_filter_set()?;
    for column in filters.columns.keys() {
        if dataset.table.column_index(column).is_none() {
            eprintln!(
                "{} Unknown column '{}', filter ignored",
                "Warning:".yellow(),
                column
            );
        }
    }
    Ok(dataset.plan.clamp_filters(filters))
}

/// Write text to a file, or to stdout when no path is given.
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> CommandResult {
    match output {
        Some(path) => {
            fs::write(path, content)
                .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
            eprintln!("Wrote {}", path.display().to_string().white().bold());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Print a table with left-aligned, width-capped columns.
pub(crate) fn print_table(table: &Table) {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| truncate(&c.to_string())).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(truncate(&column.name).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = table
        .columns()
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:width$}", truncate(&column.name), width = width))
        .collect();
    println!("  {}", header.join("  ").bold());

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:width$}", cell, width = width))
            .collect();
        println!("  {}", line.join("  "));
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", head)
    }
}
