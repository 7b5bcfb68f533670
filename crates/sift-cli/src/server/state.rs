//! Application state for the web server.

use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::info;

use sift::filter::FilterComposer;
use sift::{DataSource, Dataset, Explorer};

use super::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Loader and source cache. Only locked inside blocking tasks.
    pub explorer: Arc<Mutex<Explorer>>,
    /// Loaded datasets by label, in load order.
    pub datasets: Arc<RwLock<IndexMap<String, Dataset>>>,
    /// Composer configured with the explorer's empty-selection policy.
    pub composer: FilterComposer,
    /// Rows returned with a dataset overview.
    pub preview_rows: usize,
}

impl AppState {
    /// Create new application state around an explorer.
    pub fn new(explorer: Explorer) -> Self {
        let composer = FilterComposer::with_empty_selection(explorer.config().empty_selection);
        let preview_rows = explorer.config().preview_rows;
        Self {
            explorer: Arc::new(Mutex::new(explorer)),
            datasets: Arc::new(RwLock::new(IndexMap::new())),
            composer,
            preview_rows,
        }
    }

    /// Register a dataset, replacing any with the same label.
    pub async fn insert(&self, dataset: Dataset) {
        let mut datasets = self.datasets.write().await;
        info!(label = %dataset.label, rows = dataset.table.row_count(), "dataset registered");
        datasets.insert(dataset.label.clone(), dataset);
    }

    /// Load a source on the blocking pool and register it.
    pub async fn load(&self, source: DataSource, label: Option<String>) -> Result<Dataset, ApiError> {
        let explorer = Arc::clone(&self.explorer);
        let dataset = tokio::task::spawn_blocking(move || {
            let mut explorer = explorer
                .lock()
                .map_err(|_| ApiError::Internal("explorer lock poisoned".to_string()))?;
            explorer
                .load(source, label.as_deref())
                .map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

        self.insert(dataset.clone()).await;
        Ok(dataset)
    }
}
