//! Filter command - apply filters and export the matching rows.

use std::path::PathBuf;

use colored::Colorize;

use super::{CommandResult, build_explorer, filter_set, load_dataset, write_output};
use crate::cli::{ExploreArgs, FilterArgs};

pub fn run(
    source: String,
    explore: ExploreArgs,
    filters: FilterArgs,
    output: Option<PathBuf>,
) -> CommandResult {
    let mut explorer = build_explorer(&explore)?;
    let dataset = load_dataset(&mut explorer, &source, &explore)?;
    let filters = filter_set(&dataset, &filters)?;

    let view = explorer.filter(&dataset, &filters);
    eprintln!("{}", dataset.loaded_message());
    eprintln!("{}", view.status_line().cyan().bold());

    let csv = explorer.export(&view)?;
    write_output(output.as_deref(), &csv)
}
