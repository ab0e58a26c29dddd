//! Chart Route
//!
//! - GET /api/v1/chart/:identifier - Chart for one identifier

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ChartResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::page::{Effect, Trigger};

/// GET /api/v1/chart/:identifier
///
/// Fires the SelectorChanged rule: re-fetch the store, filter to the
/// identifier, return the replacement chart. Store failures surface as
/// errors here rather than as an empty chart.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> ApiResult<Json<ChartResponse>> {
    if identifier.trim().is_empty() {
        return Err(ApiError::Validation("identifier cannot be empty".to_string()));
    }

    let effect = state
        .rules
        .dispatch(Trigger::SelectorChanged {
            identifier: identifier.clone(),
        })
        .await?;

    let Effect::ReplaceChart(chart) = effect;
    tracing::debug!(
        identifier = %identifier,
        point_count = chart.points.len(),
        "Chart rebuilt"
    );

    Ok(Json(ChartResponse::from(chart)))
}
