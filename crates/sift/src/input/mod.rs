//! Data source loading: URLs, uploads and local files.

mod cache;
mod parser;
mod source;

pub use cache::{LoadedSource, SourceCache, SourceKey};
pub use parser::{Parser, ParserConfig, content_hash, decode_utf8_ignoring_invalid, sniff_delimiter};
pub use source::{DataSource, RawTable, SourceKind, SourceMetadata};
