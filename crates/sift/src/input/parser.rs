//! Delimited-text loading: fetching, decoding, delimiter sniffing, parsing.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Result, SiftError};
use crate::inference::infer_table;
use crate::schema::Table;
use super::source::{DataSource, RawTable, SourceMetadata};

/// Delimiter assumed for uploads and local files.
const DEFAULT_DELIMITER: u8 = b',';

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Delimiter to use for every source (None = sniff URLs, comma otherwise).
    pub delimiter: Option<u8>,
}

impl ParserConfig {
    /// Use a fixed delimiter for every source.
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

/// Loads tabular data from URLs, uploads and local files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Resolve a source into a typed table and its metadata.
    ///
    /// Fetch and parse failures abort the load; no partial table is
    /// produced.
    pub fn load(&self, source: &DataSource) -> Result<(Table, SourceMetadata)> {
        let bytes = match source {
            DataSource::Url(url) => fetch_url(url)?,
            DataSource::Upload { bytes, .. } => bytes.clone(),
            DataSource::Path(path) => read_file(path)?,
        };

        let hash = content_hash(&bytes);
        let text = decode_utf8_ignoring_invalid(&bytes);

        let delimiter = match (self.config.delimiter, source) {
            (Some(d), _) => d,
            (None, DataSource::Url(_)) => sniff_delimiter(&text),
            (None, _) => DEFAULT_DELIMITER,
        };
        debug!(source = %source, delimiter = %(delimiter as char).escape_default(), "parsing source");

        let raw = self.parse_text(&text, delimiter)?;
        let table = infer_table(&raw);

        let metadata = SourceMetadata::new(
            source,
            hash,
            bytes.len() as u64,
            delimiter,
            table.row_count(),
            table.column_count(),
        );
        info!(
            source = %source,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded dataset"
        );

        Ok((table, metadata))
    }

    /// Parse delimited text with a header row.
    pub fn parse_text(&self, text: &str, delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = normalize_headers(
            reader
                .headers()
                .map_err(parse_error)?
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        if headers.is_empty() {
            return Err(SiftError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result.map_err(parse_error)?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        Ok(RawTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick comma or tab by comparing their counts over the whole text.
/// Comma wins ties.
pub fn sniff_delimiter(text: &str) -> u8 {
    let commas = text.matches(',').count();
    let tabs = text.matches('\t').count();
    if commas >= tabs { b',' } else { b'\t' }
}

/// Decode bytes as UTF-8, dropping byte sequences that are not valid UTF-8.
pub fn decode_utf8_ignoring_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// `sha256:<hex>` digest of raw source bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

fn fetch_url(url: &str) -> Result<Vec<u8>> {
    let unavailable = |message: String| SiftError::SourceUnavailable {
        source_name: url.to_string(),
        message,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| unavailable(e.to_string()))?;
    let bytes = response.bytes().map_err(|e| unavailable(e.to_string()))?;

    Ok(bytes.to_vec())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| SiftError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_error(err: csv::Error) -> SiftError {
    let row = err
        .position()
        .map(|p| p.record() as usize)
        .unwrap_or_default();
    SiftError::Parse {
        row,
        message: err.to_string(),
    }
}

/// Name blank headers `Unnamed: <i>` and suffix repeats `.1`, `.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };

        let mut candidate = base.clone();
        while let Some(n) = seen.get_mut(&candidate) {
            *n += 1;
            candidate = format!("{base}.{n}");
        }
        seen.insert(candidate.clone(), 0);
        headers.push(candidate);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Cell, ColumnType};

    #[test]
    fn test_sniff_delimiter_csv() {
        assert_eq!(sniff_delimiter("a,b,c\n1,2,3"), b',');
    }

    #[test]
    fn test_sniff_delimiter_tsv() {
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3"), b'\t');
    }

    #[test]
    fn test_sniff_delimiter_tie_prefers_comma() {
        assert_eq!(sniff_delimiter("a,b\tc"), b',');
        assert_eq!(sniff_delimiter("abc"), b',');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let raw = parser
            .parse_text("name,age,city\nAlice,30,NYC\nBob,25,LA", b',')
            .unwrap();

        assert_eq!(raw.headers, vec!["name", "age", "city"]);
        assert_eq!(raw.row_count(), 2);
        assert_eq!(raw.rows[1][1], "25");
    }

    #[test]
    fn test_ragged_rows_are_padded_and_truncated() {
        let parser = Parser::new();
        let raw = parser.parse_text("a,b\n1\n2,3,4", b',').unwrap();
        assert_eq!(raw.rows, vec![vec!["1", ""], vec!["2", "3"]]);
    }

    #[test]
    fn test_header_only_gives_zero_rows() {
        let parser = Parser::new();
        let raw = parser.parse_text("a,b\n", b',').unwrap();
        assert_eq!(raw.column_count(), 2);
        assert_eq!(raw.row_count(), 0);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_text("", b','),
            Err(SiftError::EmptyData(_))
        ));
    }

    #[test]
    fn test_headers_are_normalized() {
        let headers = normalize_headers(vec![
            "id".into(),
            "".into(),
            "id".into(),
            "id".into(),
        ]);
        assert_eq!(headers, vec!["id", "Unnamed: 1", "id.1", "id.2"]);
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"\xef\xbb\xbfa,b\n1,\xff2";
        assert_eq!(decode_utf8_ignoring_invalid(bytes), "a,b\n1,2");
    }

    #[test]
    fn test_load_upload_presumes_comma() {
        let parser = Parser::new();
        let source = DataSource::Upload {
            name: "t.csv".into(),
            bytes: b"a\tb\n1\t2\n".to_vec(),
        };
        let (table, meta) = parser.load(&source).unwrap();
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.columns[0].name, "a\tb");
        assert_eq!(meta.format, "csv");
        assert!(meta.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_load_infers_types() {
        let parser = Parser::new();
        let source = DataSource::Upload {
            name: "t.csv".into(),
            bytes: b"name,age,active\nAlice,30,true\nBob,NA,false\n".to_vec(),
        };
        let (table, _) = parser.load(&source).unwrap();
        assert_eq!(table.columns[0].column_type, ColumnType::Text);
        assert_eq!(table.columns[1].column_type, ColumnType::Numeric);
        assert_eq!(table.columns[2].column_type, ColumnType::Boolean);
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let parser = Parser::new();
        let result = parser.load(&DataSource::Path("/nonexistent/file.csv".into()));
        assert!(matches!(result, Err(SiftError::Io { .. })));
    }
}
