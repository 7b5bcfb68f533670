//! Widget layout for a table: one classified widget per column.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::{ColumnProfile, ColumnType, Table};
use super::classifier::{ColumnClassifier, FilterKind};
use super::spec::{BoolChoice, FilterParams, FilterSet};

/// A column's widget and its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWidget {
    /// Column name.
    pub column: String,
    /// Declared type of the column.
    pub column_type: ColumnType,
    /// Chosen widget.
    pub filter: FilterKind,
    /// Sorted distinct values offered by a multi-select.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ColumnWidget {
    /// Parameters the widget starts with: nothing selected, empty text,
    /// the full numeric range, or "any".
    pub fn initial_params(&self) -> Option<FilterParams> {
        match self.filter {
            FilterKind::CategoricalSelect => Some(FilterParams::Select {
                values: BTreeSet::new(),
            }),
            FilterKind::CategoricalSubstring => Some(FilterParams::contains("")),
            FilterKind::NumericRange { min, max } => Some(FilterParams::range(min, max)),
            FilterKind::BooleanTriState => Some(FilterParams::boolean(BoolChoice::Any)),
            FilterKind::Skip { .. } => None,
        }
    }

    /// Clamp numeric parameters to this widget's bounds. Other parameters
    /// pass through unchanged.
    pub fn clamp(&self, params: FilterParams) -> FilterParams {
        match (self.filter, params) {
            (FilterKind::NumericRange { min, max }, FilterParams::Range { low, high }) => {
                FilterParams::range(low.clamp(min, max), high.clamp(min, max))
            }
            (_, params) => params,
        }
    }
}

/// Filter widgets for every column of a table, in table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPlan {
    /// One entry per column, including skipped ones.
    pub widgets: Vec<ColumnWidget>,
    /// Whether a free-text search box applies (the table has text columns).
    pub global_search: bool,
}

impl FilterPlan {
    /// Classify every column of `table` given its profiles.
    pub fn build(table: &Table, profiles: &[ColumnProfile], classifier: &ColumnClassifier) -> Self {
        let widgets = profiles
            .iter()
            .map(|profile| {
                let filter = classifier.classify(profile);
                debug!(column = %profile.name, ?filter, "classified column");

                let options = if filter == FilterKind::CategoricalSelect {
                    distinct_strings(table, profile.position)
                } else {
                    Vec::new()
                };

                ColumnWidget {
                    column: profile.name.clone(),
                    column_type: profile.column_type,
                    filter,
                    options,
                }
            })
            .collect();

        Self {
            widgets,
            global_search: table.columns.iter().any(|c| c.column_type.is_text()),
        }
    }

    /// Widget for a column.
    pub fn widget(&self, column: &str) -> Option<&ColumnWidget> {
        self.widgets.iter().find(|w| w.column == column)
    }

    /// Widgets that actually filter.
    pub fn filterable(&self) -> impl Iterator<Item = &ColumnWidget> {
        self.widgets.iter().filter(|w| w.filter.is_filterable())
    }

    /// A filter set holding every widget's initial parameters.
    ///
    /// Composing it over the planned table returns every row that has no
    /// missing value in a range-filtered column.
    pub fn initial_filters(&self) -> FilterSet {
        let mut set = FilterSet::new();
        for widget in self.filterable() {
            if let Some(params) = widget.initial_params() {
                set.columns.insert(widget.column.clone(), params);
            }
        }
        set
    }

    /// Clamp every range in `filters` to its column's bounds.
    pub fn clamp_filters(&self, mut filters: FilterSet) -> FilterSet {
        for (column, params) in filters.columns.iter_mut() {
            if let Some(widget) = self.widget(column) {
                *params = widget.clamp(params.clone());
            }
        }
        filters
    }
}

/// Sorted distinct string forms of a column's non-missing values.
fn distinct_strings(table: &Table, col_index: usize) -> Vec<String> {
    table
        .column_cells(col_index)
        .filter_map(|cell| cell.as_text().map(|t| t.into_owned()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterComposer, SkipReason};
    use crate::inference::Profiler;
    use crate::schema::{Cell, Column};

    fn survey() -> Table {
        Table::new(
            vec![
                Column::new("region", ColumnType::Text),
                Column::new("size", ColumnType::Numeric),
                Column::new("rural", ColumnType::Boolean),
                Column::new("constant", ColumnType::Numeric),
                Column::new("notes", ColumnType::Empty),
            ],
            vec![
                vec!["west".into(), 4.0.into(), true.into(), 1.0.into(), Cell::Missing],
                vec!["east".into(), 7.0.into(), false.into(), 1.0.into(), Cell::Missing],
                vec!["west".into(), Cell::Missing, true.into(), 1.0.into(), Cell::Missing],
            ],
        )
    }

    fn plan(table: &Table) -> FilterPlan {
        let profiles = Profiler::new().profile_table(table);
        FilterPlan::build(table, &profiles, &ColumnClassifier::new())
    }

    #[test]
    fn test_plan_follows_table_order() {
        let table = survey();
        let plan = plan(&table);
        let kinds: Vec<FilterKind> = plan.widgets.iter().map(|w| w.filter).collect();

        assert_eq!(
            kinds,
            vec![
                FilterKind::CategoricalSelect,
                FilterKind::NumericRange { min: 4.0, max: 7.0 },
                FilterKind::BooleanTriState,
                FilterKind::Skip {
                    reason: SkipReason::DegenerateRange
                },
                FilterKind::Skip {
                    reason: SkipReason::AllMissing
                },
            ]
        );
        assert_eq!(plan.widget("region").unwrap().options, vec!["east", "west"]);
        assert!(plan.global_search);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let table = survey();
        assert_eq!(plan(&table), plan(&table));
    }

    #[test]
    fn test_initial_filters_keep_rows_with_values() {
        let table = survey();
        let filters = plan(&table).initial_filters();
        let view = FilterComposer::new().compose(&table, &filters);

        // The full range still excludes the row whose size is missing.
        assert_eq!(view.indices(), &[0, 1]);
        assert_eq!(filters.columns.len(), 3);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let table = survey();
        let plan = plan(&table);
        let size = plan.widget("size").unwrap();
        assert_eq!(
            size.clamp(FilterParams::range(0.0, 100.0)),
            FilterParams::range(4.0, 7.0)
        );

        let filters = plan.clamp_filters(
            FilterSet::new()
                .with("size", FilterParams::range(5.0, 100.0))
                .with("unknown", FilterParams::range(0.0, 1.0)),
        );
        assert_eq!(filters.columns["size"], FilterParams::range(5.0, 7.0));
        assert_eq!(filters.columns["unknown"], FilterParams::range(0.0, 1.0));
    }
}
