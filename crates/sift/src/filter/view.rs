//! The subset of a table that passed the filters.

use crate::schema::{Cell, Table};

/// Rows of a source table that satisfy every active filter.
///
/// Holds row indices into the borrowed source; the source table is never
/// modified.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    source: &'a Table,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn new(source: &'a Table, indices: Vec<usize>) -> Self {
        Self { source, indices }
    }

    pub(crate) fn all(source: &'a Table) -> Self {
        Self::new(source, (0..source.row_count()).collect())
    }

    /// The unfiltered table.
    pub fn source(&self) -> &'a Table {
        self.source
    }

    /// Source row indices, in source order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of rows shown.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no rows passed.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of rows in the source.
    pub fn total_rows(&self) -> usize {
        self.source.row_count()
    }

    /// Iterate over the rows shown.
    pub fn rows(&self) -> impl Iterator<Item = &'a [Cell]> + '_ {
        let source = self.source;
        self.indices.iter().map(move |&i| source.rows[i].as_slice())
    }

    /// Copy the shown rows into a standalone table.
    pub fn to_table(&self) -> Table {
        self.source.select_rows(&self.indices)
    }

    /// "Showing X of N rows."
    pub fn status_line(&self) -> String {
        format!(
            "Showing {} of {} rows.",
            format_count(self.len()),
            format_count(self.total_rows())
        )
    }
}

/// Format a count with thousands separators.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
