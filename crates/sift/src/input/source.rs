//! Data source abstraction and metadata.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a table comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A direct CSV/TSV download link.
    Url(String),
    /// Uploaded file content.
    Upload { name: String, bytes: Vec<u8> },
    /// A fixed local file.
    Path(PathBuf),
}

impl DataSource {
    /// Build a source from a command-line style argument: http(s) links
    /// become URL sources, anything else a local path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            DataSource::Url(arg.to_string())
        } else {
            DataSource::Path(PathBuf::from(arg))
        }
    }

    /// The kind of this source.
    pub fn kind(&self) -> SourceKind {
        match self {
            DataSource::Url(_) => SourceKind::Url,
            DataSource::Upload { .. } => SourceKind::Upload,
            DataSource::Path(_) => SourceKind::Path,
        }
    }

    /// Label derived from the source: the file stem of the path, upload
    /// name or last URL segment.
    pub fn default_label(&self) -> String {
        let raw = match self {
            DataSource::Url(url) => url
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
            DataSource::Upload { name, .. } => name.clone(),
            DataSource::Path(path) => path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let stem = match raw.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => raw,
        };
        if stem.is_empty() {
            "dataset".to_string()
        } else {
            stem
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Upload { name, .. } => write!(f, "upload:{name}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Kind of data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Url,
    Upload,
    Path,
}

/// Metadata about a loaded source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Human-readable description of the source (URL, upload name, path).
    pub source: String,
    /// Kind of source.
    pub kind: SourceKind,
    /// SHA-256 hash of the raw bytes.
    pub hash: String,
    /// Size of the raw bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv).
    pub format: String,
    /// Text encoding the bytes were decoded with.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the source was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a source that has been parsed.
    pub fn new(
        source: &DataSource,
        hash: String,
        size_bytes: u64,
        delimiter: u8,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            _ => "delimited",
        }
        .to_string();

        Self {
            source: source.to_string(),
            kind: source.kind(),
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Parsed delimited text before type inference: headers plus raw strings.
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl RawTable {
    /// Create a new raw table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Check if a value represents a missing value.
    ///
    /// Matches the usual spreadsheet and dataframe spellings of "no value".
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("-nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed == "<NA>"
            || trimmed == "#N/A"
    }
}
