//! Typed in-memory table.

use serde::{Deserialize, Serialize};

use super::types::{Cell, ColumnType};

/// A named column with its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    /// Create a column definition.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered, typed columns and ordered rows of cells (row-major).
///
/// Every row has exactly one cell per column. Column and row order follow
/// the source. Deserialized tables are normalized the same way as
/// [`Table::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableParts")]
pub struct Table {
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct TableParts {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

impl From<TableParts> for Table {
    fn from(parts: TableParts) -> Self {
        Table::new(parts.columns, parts.rows)
    }
}

impl Table {
    /// Create a table, padding short rows with missing cells and truncating
    /// long ones to the column count.
    pub fn new(columns: Vec<Column>, mut rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Cell::Missing);
        }
        Self { columns, rows }
    }

    /// Column definitions.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Row data.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Column definition by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All cells of a column by index.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// New table holding the given rows, in the order given.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// New table holding the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec![
                Column::new("name", ColumnType::Text),
                Column::new("age", ColumnType::Numeric),
            ],
            vec![
                vec![Cell::from("Alice"), Cell::Number(30.0)],
                vec![Cell::from("Bob")],
                vec![Cell::from("Carol"), Cell::Number(28.0)],
            ],
        )
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = sample();
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
        assert!(table.rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_select_rows_keeps_columns() {
        let table = sample();
        let subset = table.select_rows(&[2, 0]);
        assert_eq!(subset.columns, table.columns);
        assert_eq!(subset.get(0, 0), Some(&Cell::from("Carol")));
        assert_eq!(subset.row_count(), 2);
    }

    #[test]
    fn test_deserialized_rows_are_normalized() {
        let json = r#"{
            "columns": [
                {"name": "a", "column_type": "text"},
                {"name": "b", "column_type": "numeric"}
            ],
            "rows": [["x", 1.0], ["y"], ["z", 2.0, "extra"]]
        }"#;
        let table: Table = serde_json::from_str(json).unwrap();

        assert!(table.rows().iter().all(|r| r.len() == 2));
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
        assert_eq!(table.get(2, 1), Some(&Cell::Number(2.0)));
        assert_eq!(table.column_cells(1).count(), 3);
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column_index("age"), Some(1));
        assert!(table.column("missing").is_none());
        assert_eq!(table.column_names(), vec!["name", "age"]);
    }
}
