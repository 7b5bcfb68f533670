//! Example: Profile a data file and apply a filter with Sift.
//!
//! Usage:
//!   cargo run --example explore -- <path_or_url> [group_column]
//!
//! Example:
//!   cargo run --example explore -- households.csv village

use std::env;

use sift::{Aggregation, DataSource, Explorer, FilterKind, SummaryOutcome, SummarySpec};

fn main() -> sift::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example explore -- <path_or_url> [group_column]");
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Sift: {}", args[1]);
    println!("{}", separator);

    let mut explorer = Explorer::new();
    let dataset = explorer.load(DataSource::from_arg(&args[1]), None)?;
    println!("{}", dataset.loaded_message());
    println!();

    println!("## Columns");
    for (profile, widget) in dataset.profiles.iter().zip(&dataset.plan.widgets) {
        let filter = match &widget.filter {
            FilterKind::CategoricalSelect => format!("select ({} options)", widget.options.len()),
            FilterKind::CategoricalSubstring => "contains".to_string(),
            FilterKind::NumericRange { min, max } => format!("range {min}..={max}"),
            FilterKind::BooleanTriState => "true/false/any".to_string(),
            FilterKind::Skip { reason } => format!("none ({reason})"),
        };
        println!(
            "  {:24} {:8} distinct={:<6} missing={:<6} {}",
            profile.name,
            profile.column_type.to_string(),
            profile.distinct_count,
            profile.missing_count,
            filter
        );
    }
    println!();

    let view = explorer.filter(&dataset, &dataset.plan.initial_filters());
    println!("{}", view.status_line());

    if let Some(group_column) = args.get(2) {
        let spec = SummarySpec::new(group_column.as_str(), Aggregation::Mean);
        match explorer.summarize(&view, &spec)? {
            SummaryOutcome::Summary(summary) => {
                println!();
                println!("## Mean by {}", group_column);
                let table = summary.to_table();
                println!("  {}", table.column_names().join(" | "));
                for row in table.rows() {
                    let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                    println!("  {}", cells.join(" | "));
                }
            }
            SummaryOutcome::NothingToSummarize { reason } => println!("{reason}"),
        }
    }

    Ok(())
}
