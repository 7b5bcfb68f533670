//! Folding a filter set into one row mask.

use tracing::{debug, warn};

use crate::schema::{Cell, Table};
use super::spec::{contains_ignore_case, EmptySelection, FilterSet, Predicate};
use super::view::FilteredView;

/// Search predicate over every text column (OR across columns).
struct GlobalSearch {
    needle: String,
    columns: Vec<usize>,
}

impl GlobalSearch {
    fn matches(&self, row: &[Cell]) -> bool {
        self.columns
            .iter()
            .any(|&i| contains_ignore_case(&row[i], &self.needle))
    }
}

/// Combines every active filter with logical AND.
///
/// Composition is a pure function of the table and the filter set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterComposer {
    empty_selection: EmptySelection,
}

impl FilterComposer {
    /// Create a composer where an empty multi-select means "no filter".
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composer with an explicit empty-selection policy.
    pub fn with_empty_selection(empty_selection: EmptySelection) -> Self {
        Self { empty_selection }
    }

    /// The empty-selection policy in use.
    pub fn empty_selection(&self) -> EmptySelection {
        self.empty_selection
    }

    /// Apply `filters` to `table`, preserving row and column order.
    ///
    /// Filters on columns the table does not have are ignored.
    pub fn compose<'a>(&self, table: &'a Table, filters: &FilterSet) -> FilteredView<'a> {
        let mut predicates: Vec<(usize, Predicate<'_>)> = Vec::new();

        for (column, params) in &filters.columns {
            let Some(index) = table.column_index(column) else {
                warn!(column = %column, "ignoring filter on unknown column");
                continue;
            };
            if params.is_active(self.empty_selection) {
                predicates.push((index, params.predicate()));
            }
        }

        let search = self.global_search(table, filters);

        if predicates.is_empty() && search.is_none() {
            return FilteredView::all(table);
        }

        let indices: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                search.as_ref().is_none_or(|s| s.matches(row))
                    && predicates.iter().all(|(i, p)| p.matches(&row[*i]))
            })
            .map(|(i, _)| i)
            .collect();

        debug!(
            active_filters = predicates.len() + usize::from(search.is_some()),
            shown = indices.len(),
            total = table.row_count(),
            "filters applied"
        );

        FilteredView::new(table, indices)
    }

    fn global_search(&self, table: &Table, filters: &FilterSet) -> Option<GlobalSearch> {
        let text = filters.search.as_deref().filter(|s| !s.is_empty())?;
        let columns: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.column_type.is_text())
            .map(|(i, _)| i)
            .collect();

        if columns.is_empty() {
            return None;
        }
        Some(GlobalSearch {
            needle: text.to_lowercase(),
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{BoolChoice, FilterParams};
    use crate::schema::{Column, ColumnType};

    fn people() -> Table {
        Table::new(
            vec![
                Column::new("name", ColumnType::Text),
                Column::new("village", ColumnType::Text),
                Column::new("age", ColumnType::Numeric),
                Column::new("member", ColumnType::Boolean),
            ],
            vec![
                vec!["Asha".into(), "Kisumu".into(), 34.0.into(), true.into()],
                vec!["Baraka".into(), "Siaya".into(), 51.0.into(), false.into()],
                vec!["Chebet".into(), Cell::Missing, 19.0.into(), true.into()],
                vec!["Dalia".into(), "Kisumu".into(), Cell::Missing, Cell::Missing],
            ],
        )
    }

    #[test]
    fn test_no_filters_returns_every_row() {
        let table = people();
        let view = FilterComposer::new().compose(&table, &FilterSet::new());
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_filters_are_anded() {
        let table = people();
        let filters = FilterSet::new()
            .with("village", FilterParams::select(["Kisumu"]))
            .with("member", FilterParams::boolean(BoolChoice::TrueOnly));
        let view = FilterComposer::new().compose(&table, &filters);
        assert_eq!(view.indices(), &[0]);
    }

    #[test]
    fn test_global_search_spans_text_columns() {
        let table = people();
        let filters = FilterSet::new().with_search("SIA");
        let view = FilterComposer::new().compose(&table, &filters);
        assert_eq!(view.indices(), &[1]);

        let filters = FilterSet::new().with_search("a").with("age", FilterParams::range(30.0, 60.0));
        let view = FilterComposer::new().compose(&table, &filters);
        assert_eq!(view.indices(), &[0, 1]);
    }

    #[test]
    fn test_empty_selection_policy() {
        let table = people();
        let filters = FilterSet::new().with("village", FilterParams::select(Vec::<String>::new()));

        let lenient = FilterComposer::new().compose(&table, &filters);
        assert_eq!(lenient.len(), 4);

        let strict = FilterComposer::with_empty_selection(EmptySelection::MatchNothing)
            .compose(&table, &filters);
        assert!(strict.is_empty());
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let table = people();
        let filters = FilterSet::new().with("household", FilterParams::select(["x"]));
        let view = FilterComposer::new().compose(&table, &filters);
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_missing_values_never_match() {
        let table = people();
        let filters = FilterSet::new().with("age", FilterParams::range(0.0, 200.0));
        let view = FilterComposer::new().compose(&table, &filters);
        assert_eq!(view.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_ragged_deserialized_table_is_filterable() {
        let json = r#"{
            "columns": [
                {"name": "a", "column_type": "text"},
                {"name": "b", "column_type": "numeric"}
            ],
            "rows": [["x", 1.0], ["y"]]
        }"#;
        let table: Table = serde_json::from_str(json).unwrap();
        let filters = FilterSet::new()
            .with("b", FilterParams::range(0.0, 5.0))
            .with_search("x");
        let view = FilterComposer::new().compose(&table, &filters);
        assert_eq!(view.indices(), &[0]);
    }
}
