//! Serve command - open the browser UI over one or more datasets.

use colored::Colorize;

use super::{CommandResult, build_explorer};
use crate::cli::ExploreArgs;
use crate::server::{app, state::AppState};
use sift::DataSource;

pub fn run(sources: Vec<String>, explore: ExploreArgs, port: u16, no_open: bool) -> CommandResult {
    let mut explorer = build_explorer(&explore)?;

    // Configured datasets first, then sources from the command line.
    let mut datasets = Vec::new();
    for (label, outcome) in explorer.load_all_configured() {
        match outcome {
            Ok(dataset) => datasets.push(dataset),
            Err(e) => eprintln!("{} Could not load '{}': {}", "Warning:".yellow(), label, e),
        }
    }
    for source in &sources {
        let label = if sources.len() == 1 {
            explore.label.as_deref()
        } else {
            None
        };
        datasets.push(explorer.load(DataSource::from_arg(source), label)?);
    }

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting sift at".cyan().bold(),
        url.white().bold()
    );
    println!();
    if datasets.is_empty() {
        println!("  No datasets loaded yet. Load one from a URL or upload a CSV.");
    }
    for dataset in &datasets {
        println!("  {}: {}", dataset.label.white().bold(), dataset.loaded_message());
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let state = AppState::new(explorer);

    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        for dataset in datasets {
            state.insert(dataset).await;
        }
        app::run_server(state, port).await
    })?;

    println!("{}", "Shutting down...".yellow());
    Ok(())
}
