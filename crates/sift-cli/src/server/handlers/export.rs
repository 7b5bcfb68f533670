//! CSV export handler.

use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sift::{FilterSet, view_to_csv};

use super::find_dataset;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Filters selecting the rows to export.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ExportRequest {
    pub filters: FilterSet,
}

/// Download the filtered rows as a CSV attachment.
pub async fn export_dataset(
    State(state): State<AppState>,
    Path(label): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let datasets = state.datasets.read().await;
    let dataset = find_dataset(&datasets, &label)?;

    let filters = dataset.plan.clamp_filters(request.filters);
    let view = state.composer.compose(&dataset.table, &filters);
    let csv = view_to_csv(&view)?;

    let disposition = format!("attachment; filename=\"{}\"", dataset.export_file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
