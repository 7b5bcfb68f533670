//! Filter parameters and per-column predicates.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::Cell;

/// What an empty multi-select means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    /// Nothing selected applies no filter.
    #[default]
    NoFilter,
    /// Nothing selected matches no rows.
    MatchNothing,
}

/// Tri-state boolean choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolChoice {
    #[default]
    Any,
    TrueOnly,
    FalseOnly,
}

/// User-chosen parameters for one column's widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterParams {
    /// Keep rows whose value (as a string) is one of `values`.
    Select { values: BTreeSet<String> },
    /// Keep rows whose value contains `pattern`, ignoring case.
    Contains { pattern: String },
    /// Keep rows with `low <= value <= high`.
    Range { low: f64, high: f64 },
    /// Keep rows matching the boolean choice.
    Boolean { choice: BoolChoice },
}

impl FilterParams {
    /// Multi-select over the given values.
    pub fn select<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterParams::Select {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Substring match.
    pub fn contains(pattern: impl Into<String>) -> Self {
        FilterParams::Contains {
            pattern: pattern.into(),
        }
    }

    /// Inclusive range.
    pub fn range(low: f64, high: f64) -> Self {
        FilterParams::Range { low, high }
    }

    /// Boolean choice.
    pub fn boolean(choice: BoolChoice) -> Self {
        FilterParams::Boolean { choice }
    }

    /// Whether these parameters restrict anything.
    ///
    /// Ranges are always active; the plan initialises them to the column's
    /// full bounds.
    pub fn is_active(&self, empty_selection: EmptySelection) -> bool {
        match self {
            FilterParams::Select { values } => {
                !values.is_empty() || empty_selection == EmptySelection::MatchNothing
            }
            FilterParams::Contains { pattern } => !pattern.is_empty(),
            FilterParams::Range { .. } => true,
            FilterParams::Boolean { choice } => *choice != BoolChoice::Any,
        }
    }

    /// Build the row predicate for these parameters.
    pub fn predicate(&self) -> Predicate<'_> {
        match self {
            FilterParams::Select { values } => Predicate::Select(values),
            FilterParams::Contains { pattern } => Predicate::Contains(pattern.to_lowercase()),
            FilterParams::Range { low, high } => Predicate::Range(*low, *high),
            FilterParams::Boolean { choice } => match choice {
                BoolChoice::Any => Predicate::Any,
                BoolChoice::TrueOnly => Predicate::Bool(true),
                BoolChoice::FalseOnly => Predicate::Bool(false),
            },
        }
    }
}

/// A compiled single-cell predicate.
///
/// Missing cells fail every predicate except `Any`.
#[derive(Debug, Clone)]
pub enum Predicate<'a> {
    Any,
    Select(&'a BTreeSet<String>),
    /// Lower-cased needle.
    Contains(String),
    Range(f64, f64),
    Bool(bool),
}

impl Predicate<'_> {
    /// Test one cell.
    pub fn matches(&self, cell: &Cell) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Select(values) => cell
                .as_text()
                .is_some_and(|text| values.contains(&*text)),
            Predicate::Contains(needle) => contains_ignore_case(cell, needle),
            Predicate::Range(low, high) => cell
                .as_f64()
                .is_some_and(|v| *low <= v && v <= *high),
            Predicate::Bool(expected) => cell.as_bool() == Some(*expected),
        }
    }
}

/// Case-insensitive substring test against a cell's string form.
pub(crate) fn contains_ignore_case(cell: &Cell, lowered_needle: &str) -> bool {
    cell.as_text()
        .is_some_and(|text| text.to_lowercase().contains(lowered_needle))
}

/// One column's filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub column: String,
    #[serde(flatten)]
    pub params: FilterParams,
}

impl FilterSpec {
    /// Create a filter on a column.
    pub fn new(column: impl Into<String>, params: FilterParams) -> Self {
        Self {
            column: column.into(),
            params,
        }
    }
}

/// Every filter for one dataset: per-column parameters plus an optional
/// free-text search across all text columns.
///
/// The presentation layer owns this value and passes it in explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Case-insensitive search over every text column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Per-column parameters, keyed by column name.
    #[serde(default)]
    pub columns: IndexMap<String, FilterParams>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global search text.
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Add or replace a column filter.
    pub fn with(mut self, column: impl Into<String>, params: FilterParams) -> Self {
        self.columns.insert(column.into(), params);
        self
    }

    /// Add or replace a column filter.
    pub fn insert(&mut self, spec: FilterSpec) {
        self.columns.insert(spec.column, spec.params);
    }

    /// Column filters as specs, in insertion order.
    pub fn specs(&self) -> impl Iterator<Item = FilterSpec> + '_ {
        self.columns
            .iter()
            .map(|(column, params)| FilterSpec::new(column.clone(), params.clone()))
    }

    /// Whether there is nothing set at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.search.as_deref().is_none_or(str::is_empty)
    }
}

impl FromIterator<FilterSpec> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterSpec>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for spec in iter {
            set.insert(spec);
        }
        set
    }
}
