//! CSV export of tables and filtered views.

use std::io::Write;

use crate::error::{Result, SiftError};
use crate::filter::FilteredView;
use crate::schema::{Cell, Column, Table};

/// Download name used when a dataset has no label.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "theta_filtered_subset.csv";

/// Download name for a dataset's filtered subset.
pub fn export_file_name(label: Option<&str>) -> String {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => format!("{label}_filtered.csv"),
        None => DEFAULT_EXPORT_FILE_NAME.to_string(),
    }
}

/// Serialise a table as UTF-8 CSV text with a header row.
pub fn table_to_csv(table: &Table) -> Result<String> {
    rows_to_csv(&table.columns, table.rows.iter().map(|r| r.as_slice()))
}

/// Serialise the rows of a filtered view as UTF-8 CSV text.
pub fn view_to_csv(view: &FilteredView<'_>) -> Result<String> {
    rows_to_csv(&view.source().columns, view.rows())
}

/// Write CSV for the given columns and rows to any writer.
///
/// Numbers use their shortest round-trip form, booleans `true`/`false`,
/// and missing cells become empty fields.
pub fn write_csv<'a, W: Write>(
    writer: W,
    columns: &[Column],
    rows: impl Iterator<Item = &'a [Cell]>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(columns.iter().map(|c| c.name.as_str()))?;
    for row in rows {
        csv_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn rows_to_csv<'a>(columns: &[Column], rows: impl Iterator<Item = &'a [Cell]>) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, columns, rows)?;
    String::from_utf8(buffer).map_err(|e| SiftError::Parse {
        row: 0,
        message: e.to_string(),
    })
}
