//! Sift CLI - type-driven dataset explorer.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile {
            source,
            explore,
            preview,
            json,
        } => commands::profile::run(source, explore, preview, json),

        Commands::Filter {
            source,
            explore,
            filters,
            output,
        } => commands::filter::run(source, explore, filters, output),

        Commands::Summarize {
            source,
            explore,
            filters,
            group_by,
            agg,
            output,
            json,
        } => commands::summarize::run(source, explore, filters, group_by, agg, output, json),

        Commands::Serve {
            sources,
            explore,
            port,
            no_open,
        } => commands::serve::run(sources, explore, port, no_open),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "sift=debug,sift_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
