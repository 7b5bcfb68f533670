//! API request handlers.

mod datasets;
mod export;
mod filter;
mod summary;

pub use datasets::*;
pub use export::*;
pub use filter::*;
pub use summary::*;

use indexmap::IndexMap;
use sift::Dataset;

use crate::server::error::ApiError;

/// Look up a loaded dataset by label.
fn find_dataset<'a>(
    datasets: &'a IndexMap<String, Dataset>,
    label: &str,
) -> Result<&'a Dataset, ApiError> {
    datasets
        .get(label)
        .ok_or_else(|| ApiError::NotFound(format!("No dataset labelled '{}'", label)))
}
