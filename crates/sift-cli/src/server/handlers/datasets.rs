//! Dataset loading and listing handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use sift::DatasetOverview;
use sift::input::{DataSource, SourceKind};

use super::find_dataset;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// One entry in the dataset list.
#[derive(Serialize)]
pub struct DatasetEntry {
    pub label: String,
    pub source: String,
    pub kind: SourceKind,
    pub row_count: usize,
    pub column_count: usize,
}

/// List loaded datasets in load order.
pub async fn list_datasets(State(state): State<AppState>) -> Json<Vec<DatasetEntry>> {
    let datasets = state.datasets.read().await;
    Json(
        datasets
            .values()
            .map(|d| DatasetEntry {
                label: d.label.clone(),
                source: d.source.source.clone(),
                kind: d.source.kind,
                row_count: d.table.row_count(),
                column_count: d.table.column_count(),
            })
            .collect(),
    )
}

/// Request to load a dataset from a URL.
#[derive(Deserialize)]
pub struct LoadUrlRequest {
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Load a dataset from an http(s) URL.
pub async fn load_url(
    State(state): State<AppState>,
    Json(request): Json<LoadUrlRequest>,
) -> Result<Json<DatasetOverview>, ApiError> {
    let url = request.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ApiError::BadRequest(format!(
            "Expected an http(s) URL, got '{}'",
            url
        )));
    }

    let dataset = state
        .load(DataSource::Url(url.to_string()), request.label)
        .await?;
    Ok(Json(dataset.overview(state.preview_rows)))
}

/// Query parameters for an upload.
#[derive(Deserialize, Default)]
pub struct UploadQuery {
    /// Label for the dataset.
    pub label: Option<String>,
    /// Original file name.
    pub name: Option<String>,
}

/// Load a dataset from an uploaded CSV body.
pub async fn upload_dataset(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<DatasetOverview>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let name = query
        .name
        .or_else(|| query.label.as_ref().map(|l| format!("{}.csv", l)))
        .unwrap_or_else(|| "upload.csv".to_string());
    let source = DataSource::Upload {
        name,
        bytes: body.to_vec(),
    };

    let dataset = state.load(source, query.label).await?;
    Ok(Json(dataset.overview(state.preview_rows)))
}

/// Overview of a loaded dataset.
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(label): Path<String>,
) -> Result<Json<DatasetOverview>, ApiError> {
    let datasets = state.datasets.read().await;
    let dataset = find_dataset(&datasets, &label)?;
    Ok(Json(dataset.overview(state.preview_rows)))
}
