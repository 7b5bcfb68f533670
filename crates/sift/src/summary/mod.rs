//! Group-by summaries over a (filtered) table.

mod group;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SiftError};
use crate::filter::FilteredView;
use crate::schema::{Cell, Column, ColumnType, Table};
use group::GroupKey;

/// Name of the single value column produced by a count.
pub const COUNT_COLUMN: &str = "count";

/// Aggregation applied per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
    Sum,
    Count,
}

impl Aggregation {
    /// Every aggregation, in menu order.
    pub const ALL: [Aggregation; 4] = [
        Aggregation::Mean,
        Aggregation::Median,
        Aggregation::Sum,
        Aggregation::Count,
    ];

    /// The per-column reduction, or `None` for a row count.
    fn reducer(&self) -> Option<Reducer> {
        match self {
            Aggregation::Mean => Some(Reducer::Mean),
            Aggregation::Median => Some(Reducer::Median),
            Aggregation::Sum => Some(Reducer::Sum),
            Aggregation::Count => None,
        }
    }
}

/// Reduction over the non-missing values of one column in one group.
#[derive(Debug, Clone, Copy)]
enum Reducer {
    Mean,
    Median,
    Sum,
}

impl Reducer {
    fn apply(self, values: &mut [f64]) -> Cell {
        match self {
            Reducer::Sum => Cell::Number(values.iter().sum()),
            Reducer::Mean if values.is_empty() => Cell::Missing,
            Reducer::Mean => Cell::Number(values.iter().sum::<f64>() / values.len() as f64),
            Reducer::Median => median(values).map(Cell::Number).unwrap_or(Cell::Missing),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Mean => write!(f, "mean"),
            Aggregation::Median => write!(f, "median"),
            Aggregation::Sum => write!(f, "sum"),
            Aggregation::Count => write!(f, "count"),
        }
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" | "avg" => Ok(Aggregation::Mean),
            "median" => Ok(Aggregation::Median),
            "sum" => Ok(Aggregation::Sum),
            "count" | "size" => Ok(Aggregation::Count),
            _ => Err(format!(
                "Unknown aggregation: {}. Use mean, median, sum, or count.",
                s
            )),
        }
    }
}

/// A group-by request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySpec {
    pub group_column: String,
    #[serde(default)]
    pub aggregation: Aggregation,
}

impl SummarySpec {
    /// Create a summary request.
    pub fn new(group_column: impl Into<String>, aggregation: Aggregation) -> Self {
        Self {
            group_column: group_column.into(),
            aggregation,
        }
    }
}

/// One output row: the group value and one aggregate per value column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub group: Cell,
    pub values: Vec<Cell>,
}

/// Result of a group-by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub group_column: String,
    pub group_type: ColumnType,
    pub aggregation: Aggregation,
    /// Aggregated numeric columns, or just `count`.
    pub value_columns: Vec<String>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Flatten into a regular table (group column first).
    pub fn to_table(&self) -> Table {
        let mut columns = vec![Column::new(self.group_column.clone(), self.group_type)];
        columns.extend(
            self.value_columns
                .iter()
                .map(|name| Column::new(name.clone(), ColumnType::Numeric)),
        );

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(row.values.len() + 1);
                cells.push(row.group.clone());
                cells.extend(row.values.iter().cloned());
                cells
            })
            .collect();

        Table::new(columns, rows)
    }
}

/// Why no summary was produced. Informational, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NothingReason {
    /// The (filtered) table has no rows.
    NoRows,
    /// A numeric aggregation was requested but no numeric column besides
    /// the group column exists.
    NoNumericColumns,
}

impl fmt::Display for NothingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NothingReason::NoRows => write!(f, "No rows to summarize."),
            NothingReason::NoNumericColumns => write!(f, "No numeric columns to summarize."),
        }
    }
}

/// Outcome of a summary request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Summary(SummaryTable),
    NothingToSummarize { reason: NothingReason },
}

impl SummaryOutcome {
    /// The summary table, if one was produced.
    pub fn table(&self) -> Option<&SummaryTable> {
        match self {
            SummaryOutcome::Summary(table) => Some(table),
            SummaryOutcome::NothingToSummarize { .. } => None,
        }
    }
}

/// Computes grouped aggregates.
pub struct SummaryEngine;

impl SummaryEngine {
    /// Summarise every row of a table.
    pub fn summarize(table: &Table, spec: &SummarySpec) -> Result<SummaryOutcome> {
        let rows: Vec<&[Cell]> = table.rows.iter().map(|r| r.as_slice()).collect();
        Self::summarize_rows(&table.columns, &rows, spec)
    }

    /// Summarise the rows of a filtered view.
    pub fn summarize_view(view: &FilteredView<'_>, spec: &SummarySpec) -> Result<SummaryOutcome> {
        let rows: Vec<&[Cell]> = view.rows().collect();
        Self::summarize_rows(&view.source().columns, &rows, spec)
    }

    fn summarize_rows(
        columns: &[Column],
        rows: &[&[Cell]],
        spec: &SummarySpec,
    ) -> Result<SummaryOutcome> {
        let group_index = columns
            .iter()
            .position(|c| c.name == spec.group_column)
            .ok_or_else(|| SiftError::UnknownColumn(spec.group_column.clone()))?;

        if rows.is_empty() {
            return Ok(SummaryOutcome::NothingToSummarize {
                reason: NothingReason::NoRows,
            });
        }

        let numeric: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(i, c)| *i != group_index && c.column_type.is_numeric())
            .map(|(i, _)| i)
            .collect();

        let reducer = spec.aggregation.reducer();
        if reducer.is_some() && numeric.is_empty() {
            return Ok(SummaryOutcome::NothingToSummarize {
                reason: NothingReason::NoNumericColumns,
            });
        }

        // First-seen order; the stable sort below keeps it for equal keys.
        let mut groups: IndexMap<GroupKey, Vec<usize>> = IndexMap::new();
        for (i, row) in rows.iter().enumerate() {
            groups
                .entry(GroupKey::from_cell(&row[group_index]))
                .or_default()
                .push(i);
        }
        let mut groups: Vec<(GroupKey, Vec<usize>)> = groups.into_iter().collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let summary_rows: Vec<SummaryRow> = groups
            .into_iter()
            .map(|(key, members)| {
                let values = match reducer {
                    None => vec![Cell::Number(members.len() as f64)],
                    Some(reducer) => numeric
                        .iter()
                        .map(|&col| {
                            let mut values: Vec<f64> = members
                                .iter()
                                .filter_map(|&r| rows[r][col].as_f64())
                                .filter(|v| !v.is_nan())
                                .collect();
                            reducer.apply(&mut values)
                        })
                        .collect(),
                };
                SummaryRow {
                    group: key.into_cell(),
                    values,
                }
            })
            .collect();
        let value_columns: Vec<String> = match reducer {
            None => vec![COUNT_COLUMN.to_string()],
            Some(_) => numeric.iter().map(|&i| columns[i].name.clone()).collect(),
        };

        debug!(
            group_column = %spec.group_column,
            aggregation = %spec.aggregation,
            groups = summary_rows.len(),
            "summary computed"
        );

        Ok(SummaryOutcome::Summary(SummaryTable {
            group_column: spec.group_column.clone(),
            group_type: columns[group_index].column_type,
            aggregation: spec.aggregation,
            value_columns,
            rows: summary_rows,
        }))
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups_table() -> Table {
        Table::new(
            vec![
                Column::new("group", ColumnType::Text),
                Column::new("x", ColumnType::Numeric),
            ],
            vec![
                vec!["A".into(), 10.0.into()],
                vec!["A".into(), 20.0.into()],
                vec!["B".into(), 5.0.into()],
            ],
        )
    }

    fn rows_of(outcome: &SummaryOutcome) -> Vec<(Cell, Vec<Cell>)> {
        outcome
            .table()
            .unwrap()
            .rows
            .iter()
            .map(|r| (r.group.clone(), r.values.clone()))
            .collect()
    }

    #[test]
    fn test_mean_by_group() {
        let outcome =
            SummaryEngine::summarize(&groups_table(), &SummarySpec::new("group", Aggregation::Mean))
                .unwrap();
        assert_eq!(
            rows_of(&outcome),
            vec![
                (Cell::from("A"), vec![Cell::Number(15.0)]),
                (Cell::from("B"), vec![Cell::Number(5.0)]),
            ]
        );
    }

    #[test]
    fn test_count_by_group() {
        let outcome = SummaryEngine::summarize(
            &groups_table(),
            &SummarySpec::new("group", Aggregation::Count),
        )
        .unwrap();
        let table = outcome.table().unwrap();
        assert_eq!(table.value_columns, vec![COUNT_COLUMN]);
        assert_eq!(
            rows_of(&outcome),
            vec![
                (Cell::from("A"), vec![Cell::Number(2.0)]),
                (Cell::from("B"), vec![Cell::Number(1.0)]),
            ]
        );
    }

    #[test]
    fn test_median_and_sum_by_group() {
        let table = Table::new(
            vec![
                Column::new("group", ColumnType::Text),
                Column::new("x", ColumnType::Numeric),
            ],
            vec![
                vec!["A".into(), 1.0.into()],
                vec!["A".into(), 9.0.into()],
                vec!["A".into(), 4.0.into()],
                vec!["B".into(), 2.0.into()],
                vec!["B".into(), 6.0.into()],
            ],
        );

        let median =
            SummaryEngine::summarize(&table, &SummarySpec::new("group", Aggregation::Median))
                .unwrap();
        assert_eq!(median.table().unwrap().value_columns, vec!["x"]);
        assert_eq!(
            rows_of(&median),
            vec![
                (Cell::from("A"), vec![Cell::Number(4.0)]),
                (Cell::from("B"), vec![Cell::Number(4.0)]),
            ]
        );

        let sum = SummaryEngine::summarize(&table, &SummarySpec::new("group", Aggregation::Sum))
            .unwrap();
        assert_eq!(
            rows_of(&sum),
            vec![
                (Cell::from("A"), vec![Cell::Number(14.0)]),
                (Cell::from("B"), vec![Cell::Number(8.0)]),
            ]
        );
    }

    #[test]
    fn test_missing_values_skip_aggregation_but_count() {
        let table = Table::new(
            vec![
                Column::new("g", ColumnType::Text),
                Column::new("x", ColumnType::Numeric),
            ],
            vec![
                vec!["A".into(), 1.0.into()],
                vec!["A".into(), Cell::Missing],
                vec!["A".into(), 3.0.into()],
                vec![Cell::Missing, Cell::Missing],
            ],
        );

        let median = SummaryEngine::summarize(&table, &SummarySpec::new("g", Aggregation::Median))
            .unwrap();
        assert_eq!(
            rows_of(&median),
            vec![
                (Cell::from("A"), vec![Cell::Number(2.0)]),
                (Cell::Missing, vec![Cell::Missing]),
            ]
        );

        let sum = SummaryEngine::summarize(&table, &SummarySpec::new("g", Aggregation::Sum)).unwrap();
        assert_eq!(rows_of(&sum)[1].1, vec![Cell::Number(0.0)]);

        let count =
            SummaryEngine::summarize(&table, &SummarySpec::new("g", Aggregation::Count)).unwrap();
        assert_eq!(rows_of(&count)[0].1, vec![Cell::Number(3.0)]);
    }

    #[test]
    fn test_numeric_groups_sort_numerically() {
        let table = Table::new(
            vec![
                Column::new("year", ColumnType::Numeric),
                Column::new("n", ColumnType::Numeric),
            ],
            vec![
                vec![2021.0.into(), 1.0.into()],
                vec![999.0.into(), 2.0.into()],
                vec![2021.0.into(), 3.0.into()],
            ],
        );
        let outcome =
            SummaryEngine::summarize(&table, &SummarySpec::new("year", Aggregation::Sum)).unwrap();
        let summary = outcome.table().unwrap();

        assert_eq!(summary.value_columns, vec!["n"]);
        assert_eq!(
            rows_of(&outcome),
            vec![
                (Cell::Number(999.0), vec![Cell::Number(2.0)]),
                (Cell::Number(2021.0), vec![Cell::Number(4.0)]),
            ]
        );
    }

    #[test]
    fn test_nothing_to_summarize() {
        let text_only = Table::new(
            vec![Column::new("g", ColumnType::Text)],
            vec![vec!["A".into()]],
        );
        let outcome =
            SummaryEngine::summarize(&text_only, &SummarySpec::new("g", Aggregation::Mean)).unwrap();
        assert_eq!(
            outcome,
            SummaryOutcome::NothingToSummarize {
                reason: NothingReason::NoNumericColumns
            }
        );

        let counted =
            SummaryEngine::summarize(&text_only, &SummarySpec::new("g", Aggregation::Count)).unwrap();
        assert!(counted.table().is_some());

        let empty = groups_table().head(0);
        let outcome =
            SummaryEngine::summarize(&empty, &SummarySpec::new("group", Aggregation::Count)).unwrap();
        assert_eq!(
            outcome,
            SummaryOutcome::NothingToSummarize {
                reason: NothingReason::NoRows
            }
        );
    }

    #[test]
    fn test_unknown_group_column() {
        let result =
            SummaryEngine::summarize(&groups_table(), &SummarySpec::new("nope", Aggregation::Mean));
        assert!(matches!(result, Err(SiftError::UnknownColumn(_))));
    }

    #[test]
    fn test_to_table_layout() {
        let outcome =
            SummaryEngine::summarize(&groups_table(), &SummarySpec::new("group", Aggregation::Mean))
                .unwrap();
        let table = outcome.table().unwrap().to_table();
        assert_eq!(table.column_names(), vec!["group", "x"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_parse_aggregation() {
        assert_eq!("MEDIAN".parse::<Aggregation>().unwrap(), Aggregation::Median);
        assert!("mode".parse::<Aggregation>().is_err());
    }
}
