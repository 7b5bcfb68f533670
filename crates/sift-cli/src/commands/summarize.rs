//! Summarize command - group filtered rows and aggregate numeric columns.

use std::path::PathBuf;

use colored::Colorize;
use sift::{Aggregation, SummaryOutcome, SummarySpec, table_to_csv};

use super::{CommandResult, build_explorer, filter_set, load_dataset, print_table, write_output};
use crate::cli::{ExploreArgs, FilterArgs};

pub fn run(
    source: String,
    explore: ExploreArgs,
    filters: FilterArgs,
    group_by: String,
    aggregation: Aggregation,
    output: Option<PathBuf>,
    json: bool,
) -> CommandResult {
    let mut explorer = build_explorer(&explore)?;
    let dataset = load_dataset(&mut explorer, &source, &explore)?;
    let filters = filter_set(&dataset, &filters)?;

    let view = explorer.filter(&dataset, &filters);
    let outcome = explorer.summarize(&view, &SummarySpec::new(group_by, aggregation))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    eprintln!("{}", view.status_line().cyan().bold());
    match outcome {
        SummaryOutcome::Summary(summary) => {
            let table = summary.to_table();
            if output.is_some() {
                write_output(output.as_deref(), &table_to_csv(&table)?)?;
            } else {
                println!(
                    "{}",
                    format!("{} by {}", summary.aggregation, summary.group_column)
                        .yellow()
                        .bold()
                );
                print_table(&table);
            }
        }
        SummaryOutcome::NothingToSummarize { reason } => {
            println!("{}", reason.to_string().yellow());
        }
    }

    Ok(())
}
