//! Identifier Routes
//!
//! - GET /api/v1/identifiers - Distinct identifiers in the store
//!
//! REST mirror of the push channel's update-dropdown payload, for initial
//! population and clients without a WebSocket.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::IdentifierListResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::websocket::distinct_identifiers;

/// GET /api/v1/identifiers
pub async fn list_identifiers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<IdentifierListResponse>> {
    let rows = state.source.fetch_daily_averages().await?;
    let identifiers = distinct_identifiers(&rows);

    Ok(Json(IdentifierListResponse {
        total: identifiers.len(),
        identifiers,
    }))
}
