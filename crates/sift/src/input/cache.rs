//! Memoized source loading keyed by input identity.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::schema::Table;
use super::parser::{content_hash, Parser};
use super::source::{DataSource, SourceMetadata};

/// Identity of a load request.
///
/// Uploads are keyed by content hash, so re-uploading the same bytes under a
/// different name is still a hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Url(String),
    Upload(String),
    Path(PathBuf),
}

impl SourceKey {
    /// Identity key for a source.
    pub fn of(source: &DataSource) -> Self {
        match source {
            DataSource::Url(url) => SourceKey::Url(url.clone()),
            DataSource::Upload { bytes, .. } => SourceKey::Upload(content_hash(bytes)),
            DataSource::Path(path) => SourceKey::Path(path.clone()),
        }
    }
}

/// A loaded table shared between the cache and its consumers.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub table: Arc<Table>,
    pub metadata: SourceMetadata,
}

/// Cache of parsed tables.
///
/// Entries live as long as the cache; a changed input identity simply
/// misses. Failed loads are never stored, and nothing is retried.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<SourceKey, LoadedSource>,
}

impl SourceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `source`, loading it with `parser` on a
    /// miss.
    ///
    /// A hit reports the requesting source's name and kind; `loaded_at` and
    /// the hash stay those of the parse that filled the entry.
    pub fn load(&mut self, parser: &Parser, source: &DataSource) -> Result<LoadedSource> {
        let key = SourceKey::of(source);
        if let Some(hit) = self.entries.get(&key) {
            debug!(source = %source, "source cache hit");
            let mut hit = hit.clone();
            hit.metadata.source = source.to_string();
            hit.metadata.kind = source.kind();
            return Ok(hit);
        }

        debug!(source = %source, "source cache miss");
        let (table, metadata) = parser.load(source)?;
        let loaded = LoadedSource {
            table: Arc::new(table),
            metadata,
        };
        self.entries.insert(key, loaded.clone());
        Ok(loaded)
    }

    /// Whether a source is already cached.
    pub fn contains(&self, source: &DataSource) -> bool {
        self.entries.contains_key(&SourceKey::of(source))
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
