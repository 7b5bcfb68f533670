//! Core type definitions for cells and column types.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared data type of a column.
///
/// A column keeps one declared type regardless of how many of its cells are
/// missing. `Empty` is reserved for columns where every cell is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Text/categorical values.
    Text,
    /// Integer or floating-point numbers.
    Numeric,
    /// Boolean values (true/false).
    Boolean,
    /// No non-missing values at all.
    #[default]
    Empty,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }

    /// Returns true if this type holds free text.
    pub fn is_text(&self) -> bool {
        matches!(self, ColumnType::Text)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Empty => write!(f, "empty"),
        }
    }
}

/// A single table cell.
///
/// Serializes untagged, so JSON consumers see plain `null`, booleans,
/// numbers and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Whether the cell holds no value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if the cell is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value, if the cell is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String form used by categorical and text predicates.
    ///
    /// Missing cells have no string form, so they never match a text
    /// predicate.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(v) => Some(Cow::Owned(v.to_string())),
            Cell::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => write!(f, "{text}"),
            None => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_text_form_is_shortest() {
        assert_eq!(Cell::Number(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(Cell::Number(2.5).as_text().as_deref(), Some("2.5"));
    }

    #[test]
    fn test_missing_has_no_text_form() {
        assert!(Cell::Missing.as_text().is_none());
        assert_eq!(Cell::Missing.to_string(), "");
    }

    #[test]
    fn test_cell_json_is_untagged() {
        let cells = vec![
            Cell::Missing,
            Cell::Bool(true),
            Cell::Number(1.5),
            Cell::Text("x".into()),
        ];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[null,true,1.5,"x"]"#);

        let back: Vec<Cell> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }
}
