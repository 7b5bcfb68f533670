//! Column profiling: missing counts, cardinality and numeric bounds.

use std::collections::HashSet;

use crate::schema::{Cell, ColumnProfile, NumericBounds, Table};

/// Running min/max over numeric cells.
#[derive(Debug, Clone, Copy)]
struct RunningBounds {
    count: usize,
    min: f64,
    max: f64,
}

impl RunningBounds {
    fn new() -> Self {
        Self {
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn finish(self) -> Option<NumericBounds> {
        (self.count > 0).then_some(NumericBounds {
            min: self.min,
            max: self.max,
        })
    }
}

/// Computes [`ColumnProfile`]s for a table.
pub struct Profiler;

impl Profiler {
    /// Create a new profiler.
    pub fn new() -> Self {
        Self
    }

    /// Profile every column, in table order.
    pub fn profile_table(&self, table: &Table) -> Vec<ColumnProfile> {
        (0..table.column_count())
            .map(|i| self.profile_column(table, i))
            .collect()
    }

    /// Profile a single column by index.
    pub fn profile_column(&self, table: &Table, col_index: usize) -> ColumnProfile {
        let column = &table.columns[col_index];

        let mut missing_count = 0;
        let mut distinct: HashSet<String> = HashSet::new();
        let mut bounds = RunningBounds::new();

        for cell in table.column_cells(col_index) {
            if let Cell::Number(v) = cell {
                bounds.add(*v);
            }
            match cell.as_text() {
                Some(text) => {
                    if !distinct.contains(&*text) {
                        distinct.insert(text.into_owned());
                    }
                }
                None => missing_count += 1,
            }
        }

        ColumnProfile {
            name: column.name.clone(),
            position: col_index,
            column_type: column.column_type,
            count: table.row_count(),
            missing_count,
            distinct_count: distinct.len(),
            bounds: if column.column_type.is_numeric() {
                bounds.finish()
            } else {
                None
            },
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType};

    fn numeric_table(values: Vec<Cell>) -> Table {
        Table::new(
            vec![Column::new("value", ColumnType::Numeric)],
            values.into_iter().map(|v| vec![v]).collect(),
        )
    }

    #[test]
    fn test_numeric_bounds() {
        let table = numeric_table(vec![
            Cell::Number(3.0),
            Cell::Missing,
            Cell::Number(-1.5),
            Cell::Number(3.0),
        ]);
        let profile = Profiler::new().profile_column(&table, 0);

        assert_eq!(profile.missing_count, 1);
        assert_eq!(profile.distinct_count, 2);
        assert_eq!(profile.bounds, Some(NumericBounds { min: -1.5, max: 3.0 }));
    }

    #[test]
    fn test_detect_missing() {
        let table = Table::new(
            vec![Column::new("notes", ColumnType::Empty)],
            vec![vec![Cell::Missing], vec![Cell::Missing]],
        );
        let profile = Profiler::new().profile_column(&table, 0);

        assert!(profile.is_all_missing());
        assert_eq!(profile.distinct_count, 0);
        assert!(profile.bounds.is_none());
        assert_eq!(profile.missing_percentage(), 100.0);
    }

    #[test]
    fn test_text_distinct_count() {
        let table = Table::new(
            vec![Column::new("category", ColumnType::Text)],
            ["A", "B", "A", "C", "B"]
                .into_iter()
                .map(|v| vec![Cell::from(v)])
                .collect(),
        );
        let profile = Profiler::new().profile_column(&table, 0);

        assert_eq!(profile.distinct_count, 3);
        assert_eq!(profile.column_type, ColumnType::Text);
    }
}
