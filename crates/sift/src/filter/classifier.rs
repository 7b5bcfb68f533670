//! Column classification: which filter widget a column gets.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnProfile, ColumnType};

/// Default maximum distinct values for a multi-select widget.
pub const DEFAULT_CATEGORICAL_THRESHOLD: usize = 40;

/// Why a column gets no filter widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Every cell is missing.
    AllMissing,
    /// An allow-list is configured and the column is not on it.
    NotAllowed,
    /// A numeric bound is infinite.
    NonFiniteBound,
    /// Numeric min equals max.
    DegenerateRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::AllMissing => "all values missing",
            SkipReason::NotAllowed => "not in filter columns",
            SkipReason::NonFiniteBound => "infinite bound",
            SkipReason::DegenerateRange => "single value",
        };
        f.write_str(text)
    }
}

/// Filter widget kind chosen for a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    /// Pick values from the column's distinct values.
    CategoricalSelect,
    /// Case-insensitive substring match.
    CategoricalSubstring,
    /// Inclusive numeric range within the column's bounds.
    NumericRange { min: f64, max: f64 },
    /// Any / true only / false only.
    BooleanTriState,
    /// No widget.
    Skip { reason: SkipReason },
}

impl FilterKind {
    /// Whether the column gets a widget at all.
    pub fn is_filterable(&self) -> bool {
        !matches!(self, FilterKind::Skip { .. })
    }
}

/// Classifier settings.
///
/// Without an allow-list every column is considered, which is the generic
/// explorer. With one, only the listed columns get widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Maximum distinct text values for a multi-select.
    pub categorical_threshold: usize,
    /// Columns eligible for filtering (None = all).
    pub allow_list: Option<HashSet<String>>,
    /// Columns that always get a multi-select, whatever their cardinality.
    pub categorical_columns: HashSet<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            allow_list: None,
            categorical_columns: HashSet::new(),
        }
    }
}

impl ClassifierConfig {
    /// Set the multi-select threshold.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.categorical_threshold = threshold;
        self
    }

    /// Restrict filtering to the given columns.
    pub fn with_allow_list<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Force multi-select widgets for the given columns.
    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Chooses a [`FilterKind`] from a column profile.
///
/// The decision depends only on the profile and the configuration, so an
/// unchanged table always yields the same plan.
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom settings.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one column.
    pub fn classify(&self, profile: &ColumnProfile) -> FilterKind {
        if let Some(allowed) = &self.config.allow_list {
            if !allowed.contains(&profile.name) {
                return FilterKind::Skip {
                    reason: SkipReason::NotAllowed,
                };
            }
        }

        if profile.column_type == ColumnType::Empty || profile.is_all_missing() {
            return FilterKind::Skip {
                reason: SkipReason::AllMissing,
            };
        }

        if self.config.categorical_columns.contains(&profile.name) {
            return FilterKind::CategoricalSelect;
        }

        match profile.column_type {
            ColumnType::Text => {
                if profile.distinct_count <= self.config.categorical_threshold {
                    FilterKind::CategoricalSelect
                } else {
                    FilterKind::CategoricalSubstring
                }
            }
            ColumnType::Boolean => FilterKind::BooleanTriState,
            ColumnType::Numeric => match profile.bounds {
                None => FilterKind::Skip {
                    reason: SkipReason::AllMissing,
                },
                Some(bounds) if !bounds.is_finite() => FilterKind::Skip {
                    reason: SkipReason::NonFiniteBound,
                },
                Some(bounds) if bounds.is_degenerate() => FilterKind::Skip {
                    reason: SkipReason::DegenerateRange,
                },
                Some(bounds) => FilterKind::NumericRange {
                    min: bounds.min,
                    max: bounds.max,
                },
            },
            ColumnType::Empty => FilterKind::Skip {
                reason: SkipReason::AllMissing,
            },
        }
    }
}
