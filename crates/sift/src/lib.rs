//! Sift: a type-driven explorer for tabular datasets.
//!
//! Sift loads a delimited table from a URL, an uploaded file or a local
//! path, inspects each column's declared type and cardinality, and derives a
//! filter widget per column. Filters are ANDed into a row subset that can be
//! summarized per group or exported as CSV.
//!
//! # Core Principles
//!
//! - **Type-driven**: widgets come from the data, not from a schema file
//! - **Non-destructive**: filtering produces a view over the source rows
//! - **Deterministic**: the same table always yields the same widgets
//!
//! # Example
//!
//! ```no_run
//! use sift::{DataSource, Explorer, FilterParams, FilterSet};
//!
//! let mut explorer = Explorer::new();
//! let dataset = explorer
//!     .load(DataSource::from_arg("households.csv"), None)
//!     .unwrap();
//!
//! let filters = FilterSet::new().with("size", FilterParams::range(2.0, 4.0));
//! let view = explorer.filter(&dataset, &filters);
//! println!("{}", view.status_line());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod inference;
pub mod input;
pub mod schema;
pub mod summary;

mod explorer;

pub use crate::explorer::{Dataset, DatasetOverview, Explorer};
pub use config::{DatasetConfig, ExplorerConfig, JoinKey};
pub use error::{Result, SiftError};
pub use export::{export_file_name, table_to_csv, view_to_csv};
pub use filter::{
    BoolChoice, ColumnClassifier, ColumnWidget, EmptySelection, FilterComposer, FilterKind,
    FilterParams, FilterPlan, FilterSet, FilterSpec, FilteredView,
};
pub use input::{DataSource, SourceMetadata};
pub use schema::{Cell, Column, ColumnProfile, ColumnType, Table};
pub use summary::{Aggregation, SummaryEngine, SummaryOutcome, SummarySpec, SummaryTable};
