//! CLI argument definitions using clap.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sift::{Aggregation, BoolChoice, EmptySelection, FilterParams, FilterSet};

/// Sift: type-driven explorer for tabular datasets
#[derive(Parser)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a dataset and show its columns and filter widgets
    Profile {
        /// Data source: an http(s) URL or a local CSV path
        #[arg(value_name = "SOURCE")]
        source: String,

        #[command(flatten)]
        explore: ExploreArgs,

        /// Number of preview rows to print
        #[arg(long)]
        preview: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply filters and write the matching rows as CSV
    Filter {
        /// Data source: an http(s) URL or a local CSV path
        #[arg(value_name = "SOURCE")]
        source: String,

        #[command(flatten)]
        explore: ExploreArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output path for the filtered CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Group filtered rows by a column and aggregate numeric columns
    Summarize {
        /// Data source: an http(s) URL or a local CSV path
        #[arg(value_name = "SOURCE")]
        source: String,

        #[command(flatten)]
        explore: ExploreArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Column to group by
        #[arg(long, short = 'g')]
        group_by: String,

        /// Aggregation: mean, median, sum or count
        #[arg(long, short = 'a', default_value = "mean")]
        agg: Aggregation,

        /// Output path for the summary CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },

    /// Open the browser UI
    Serve {
        /// Data sources to load at startup
        #[arg(value_name = "SOURCE")]
        sources: Vec<String>,

        #[command(flatten)]
        explore: ExploreArgs,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,
    },
}

/// Settings shared by every command.
#[derive(Args, Clone, Debug, Default)]
pub struct ExploreArgs {
    /// JSON configuration file
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Label for the dataset (selects a configured schema)
    #[arg(long, short = 'l')]
    pub label: Option<String>,

    /// Maximum distinct values for a multi-select filter
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Meaning of an empty multi-select: no-filter or match-nothing
    #[arg(long, value_parser = parse_empty_selection)]
    pub empty_selection: Option<EmptySelection>,

    /// Field delimiter for every source: comma, tab, or one character
    /// (default: sniff URLs, comma otherwise)
    #[arg(long, short = 'd', value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

/// Filter flags.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive search across all text columns
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Multi-select filter: COLUMN=VALUE[,VALUE...]
    #[arg(long, value_name = "COLUMN=VALUES")]
    pub select: Vec<String>,

    /// Substring filter: COLUMN=TEXT
    #[arg(long, value_name = "COLUMN=TEXT")]
    pub contains: Vec<String>,

    /// Inclusive numeric range: COLUMN=LOW:HIGH
    #[arg(long, value_name = "COLUMN=LOW:HIGH")]
    pub range: Vec<String>,

    /// Boolean filter: COLUMN=true|false|any
    #[arg(long = "bool", value_name = "COLUMN=CHOICE")]
    pub boolean: Vec<String>,

    /// JSON file holding a filter set; flags override its entries
    #[arg(long, value_name = "FILE")]
    pub filters: Option<PathBuf>,
}

impl FilterArgs {
    /// Build the filter set from the file and flags.
    pub fn to_filter_set(&self) -> Result<FilterSet, String> {
        let mut set = match &self.filters {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
                serde_json::from_str(&content)
                    .map_err(|e| format!("Invalid filter file {}: {}", path.display(), e))?
            }
            None => FilterSet::new(),
        };

        if let Some(search) = &self.search {
            set.search = Some(search.clone());
        }
        for arg in &self.select {
            let (column, values) = split_column(arg)?;
            let values = values.split(',').map(str::trim).filter(|v| !v.is_empty());
            set.columns
                .insert(column.to_string(), FilterParams::select(values));
        }
        for arg in &self.contains {
            let (column, text) = split_column(arg)?;
            set.columns
                .insert(column.to_string(), FilterParams::contains(text));
        }
        for arg in &self.range {
            let (column, bounds) = split_column(arg)?;
            set.columns.insert(column.to_string(), parse_range(bounds)?);
        }
        for arg in &self.boolean {
            let (column, choice) = split_column(arg)?;
            set.columns.insert(
                column.to_string(),
                FilterParams::boolean(parse_bool_choice(choice)?),
            );
        }

        Ok(set)
    }
}

fn split_column(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => Ok((column.trim(), value)),
        _ => Err(format!("Expected COLUMN=VALUE, got '{}'", arg)),
    }
}

fn parse_range(bounds: &str) -> Result<FilterParams, String> {
    let (low, high) = bounds
        .split_once(':')
        .ok_or_else(|| format!("Expected LOW:HIGH, got '{}'", bounds))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|_| format!("Invalid range bound: '{}'", low))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|_| format!("Invalid range bound: '{}'", high))?;
    Ok(FilterParams::range(low, high))
}

fn parse_bool_choice(s: &str) -> Result<BoolChoice, String> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" => Ok(BoolChoice::TrueOnly),
        "false" | "no" => Ok(BoolChoice::FalseOnly),
        "any" | "all" => Ok(BoolChoice::Any),
        _ => Err(format!("Unknown choice: {}. Use true, false, or any.", s)),
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "comma" | "," => Ok(b','),
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "semicolon" | ";" => Ok(b';'),
        "pipe" | "|" => Ok(b'|'),
        _ if s.len() == 1 => Ok(s.as_bytes()[0]),
        _ => Err(format!(
            "Unknown delimiter: {}. Use comma, tab, or a single character.",
            s
        )),
    }
}

fn parse_empty_selection(s: &str) -> Result<EmptySelection, String> {
    match s.to_lowercase().replace('_', "-").as_str() {
        "no-filter" | "all" => Ok(EmptySelection::NoFilter),
        "match-nothing" | "none" => Ok(EmptySelection::MatchNothing),
        _ => Err(format!(
            "Unknown policy: {}. Use no-filter or match-nothing.",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_flags() {
        let args = FilterArgs {
            search: Some("maize".to_string()),
            select: vec!["village=A, B".to_string()],
            contains: vec!["notes=dry".to_string()],
            range: vec!["size=2:4".to_string()],
            boolean: vec!["rural=false".to_string()],
            filters: None,
        };

        let set = args.to_filter_set().unwrap();
        assert_eq!(set.search.as_deref(), Some("maize"));
        assert_eq!(set.columns["village"], FilterParams::select(["A", "B"]));
        assert_eq!(set.columns["notes"], FilterParams::contains("dry"));
        assert_eq!(set.columns["size"], FilterParams::range(2.0, 4.0));
        assert_eq!(
            set.columns["rural"],
            FilterParams::boolean(BoolChoice::FalseOnly)
        );
    }

    #[test]
    fn test_bad_flags() {
        assert!(split_column("village").is_err());
        assert!(parse_range("2-4").is_err());
        assert!(parse_range("two:4").is_err());
        assert!(parse_bool_choice("maybe").is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("::").is_err());
    }

    #[test]
    fn test_parse_empty_selection() {
        assert_eq!(
            parse_empty_selection("match_nothing").unwrap(),
            EmptySelection::MatchNothing
        );
        assert_eq!(
            parse_empty_selection("no-filter").unwrap(),
            EmptySelection::NoFilter
        );
    }
}
