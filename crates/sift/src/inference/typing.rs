//! Column type inference over raw parsed text.

use crate::input::RawTable;
use crate::schema::{Cell, Column, ColumnType, Table};

/// Infer a declared type for every column and convert raw strings to cells.
///
/// A column is Boolean when every non-missing value is a boolean literal,
/// Numeric when every non-missing value parses as a number, Text otherwise,
/// and Empty when it has no values at all.
pub fn infer_table(raw: &RawTable) -> Table {
    let column_types: Vec<ColumnType> = (0..raw.column_count())
        .map(|i| infer_column_type(raw.column_values(i)))
        .collect();

    let columns = raw
        .headers
        .iter()
        .zip(&column_types)
        .map(|(name, ty)| Column::new(name.clone(), *ty))
        .collect();

    let rows = raw
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&column_types)
                .map(|(value, ty)| to_cell(value, *ty))
                .collect()
        })
        .collect();

    Table::new(columns, rows)
}

/// Infer the declared type of one column from its raw values.
pub fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> ColumnType {
    let mut seen_any = false;
    let mut all_bool = true;
    let mut all_numeric = true;

    for value in values.filter(|v| !RawTable::is_null_value(v)) {
        seen_any = true;
        all_bool &= parse_bool(value).is_some();
        all_numeric &= parse_number(value).is_some();
        if !all_bool && !all_numeric {
            return ColumnType::Text;
        }
    }

    if !seen_any {
        ColumnType::Empty
    } else if all_bool {
        ColumnType::Boolean
    } else if all_numeric {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}

/// Convert one raw value to a cell of the column's declared type.
fn to_cell(value: &str, column_type: ColumnType) -> Cell {
    if RawTable::is_null_value(value) {
        return Cell::Missing;
    }
    match column_type {
        ColumnType::Boolean => parse_bool(value).map(Cell::Bool).unwrap_or(Cell::Missing),
        ColumnType::Numeric => parse_number(value).map(Cell::Number).unwrap_or(Cell::Missing),
        ColumnType::Text => Cell::Text(value.to_string()),
        ColumnType::Empty => Cell::Missing,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a number, treating NaN as "not a value". Infinities are kept so
/// that unbounded columns can be recognised later.
fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}
