//! Profile command - show columns, their filter widgets and a preview.

use colored::Colorize;
use sift::FilterKind;

use super::{CommandResult, build_explorer, load_dataset, print_table};
use crate::cli::ExploreArgs;

pub fn run(source: String, explore: ExploreArgs, preview: Option<usize>, json: bool) -> CommandResult {
    let mut explorer = build_explorer(&explore)?;
    let dataset = load_dataset(&mut explorer, &source, &explore)?;
    let preview_rows = preview.unwrap_or(explorer.config().preview_rows);

    if json {
        let overview = dataset.overview(preview_rows);
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    println!("{}", dataset.loaded_message().green().bold());
    println!(
        "  Source: {} ({}, {} bytes)",
        dataset.source.source.white(),
        dataset.source.format,
        dataset.source.size_bytes
    );
    println!();

    println!("{}", "Columns:".yellow().bold());
    for (profile, widget) in dataset.profiles.iter().zip(&dataset.plan.widgets) {
        let filter = match &widget.filter {
            FilterKind::CategoricalSelect => {
                format!("select ({} options)", widget.options.len()).green()
            }
            FilterKind::CategoricalSubstring => "contains".green(),
            FilterKind::NumericRange { min, max } => format!("range {} to {}", min, max).green(),
            FilterKind::BooleanTriState => "true / false / any".green(),
            FilterKind::Skip { reason } => format!("no filter ({})", reason).dimmed(),
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

    if dataset.plan.global_search {
        println!();
        println!("Search applies to every text column.");
    }

    if preview_rows > 0 && !dataset.table.is_empty() {
        println!();
        println!(
            "{}",
            format!("Preview (first {} rows):", preview_rows.min(dataset.table.row_count()))
                .yellow()
                .bold()
        );
        print_table(&dataset.preview(preview_rows));
    }

    Ok(())
}
