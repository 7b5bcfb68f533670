//! Per-column profile derived from a table.

use serde::{Deserialize, Serialize};

use super::types::ColumnType;

/// Observed bounds of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: f64,
    pub max: f64,
}

impl NumericBounds {
    /// Whether both bounds are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Whether the bounds collapse to a single value.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Read-only statistics for one column, used to pick a filter widget.
///
/// Profiles are recomputed whenever a new table is loaded and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Declared data type.
    pub column_type: ColumnType,
    /// Total number of cells (including missing).
    pub count: usize,
    /// Number of missing cells.
    pub missing_count: usize,
    /// Number of distinct non-missing values.
    pub distinct_count: usize,
    /// Min/max for numeric columns with at least one value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<NumericBounds>,
}

impl ColumnProfile {
    /// Whether the column has no values at all.
    pub fn is_all_missing(&self) -> bool {
        self.missing_count == self.count
    }

    /// Get the missing percentage.
    pub fn missing_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.missing_count as f64 / self.count as f64) * 100.0
        }
    }
}
