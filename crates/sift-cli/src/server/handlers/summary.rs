//! Summary handler.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use sift::{Aggregation, FilterSet, SummaryEngine, SummaryOutcome, SummarySpec};

use super::find_dataset;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Group-by request over the filtered rows.
#[derive(Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub filters: FilterSet,
    pub group_by: String,
    #[serde(default)]
    pub aggregation: Aggregation,
}

/// Summarize the filtered rows of a dataset.
pub async fn summarize_dataset(
    State(state): State<AppState>,
    Path(label): Path<String>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryOutcome>, ApiError> {
    let datasets = state.datasets.read().await;
    let dataset = find_dataset(&datasets, &label)?;

    let filters = dataset.plan.clamp_filters(request.filters);
    let view = state.composer.compose(&dataset.table, &filters);
    let spec = SummarySpec::new(request.group_by, request.aggregation);

    Ok(Json(SummaryEngine::summarize_view(&view, &spec)?))
}
