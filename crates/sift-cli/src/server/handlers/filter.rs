//! Filter handler.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use sift::{Cell, Column, FilterSet};

use super::find_dataset;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Filters to apply and how many matching rows to return.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct FilterRequest {
    pub filters: FilterSet,
    /// Maximum rows in the response (default: the preview size).
    pub limit: Option<usize>,
}

/// Matching rows of a filtered dataset.
#[derive(Serialize)]
pub struct FilterResponse {
    /// "Showing X of N rows."
    pub status: String,
    pub shown: usize,
    pub total: usize,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
    /// Whether `rows` holds fewer rows than `shown`.
    pub truncated: bool,
}

/// Apply filters to a dataset.
pub async fn filter_dataset(
    State(state): State<AppState>,
    Path(label): Path<String>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<FilterResponse>, ApiError> {
    let datasets = state.datasets.read().await;
    let dataset = find_dataset(&datasets, &label)?;

    let filters = dataset.plan.clamp_filters(request.filters);
    let view = state.composer.compose(&dataset.table, &filters);
    let limit = request.limit.unwrap_or(state.preview_rows);

    let rows: Vec<Vec<Cell>> = view.rows().take(limit).map(|r| r.to_vec()).collect();

    Ok(Json(FilterResponse {
        status: view.status_line(),
        shown: view.len(),
        total: view.total_rows(),
        columns: dataset.table.columns().to_vec(),
        truncated: rows.len() < view.len(),
        rows,
    }))
}
