use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{blocking, envelope};
use crate::error::AppError;
use crate::state::AppState;
use attendant_core::paths::validate_event_id;
use attendant_core::store::{PositionStore, DEFAULT_LIST_LIMIT};
use attendant_core::types::{NewPosition, PositionUpdate};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
    pub limit: Option<usize>,
    pub area: Option<String>,
}

/// GET /api/events/:id/positions — list positions, optionally including
/// inactive ones and filtered by area. The area filter applies before
/// `limit`; `areas` covers every listed position regardless of the filter.
pub async fn list_positions(
    State(app): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .min(DEFAULT_LIST_LIMIT);
    let store = app.store.clone();
    let id = event_id.clone();
    let mut positions =
        blocking(move || store.list_positions(&id, query.include_inactive, DEFAULT_LIST_LIMIT))
            .await?;

    let mut areas: Vec<String> = positions.iter().filter_map(|p| p.area.clone()).collect();
    areas.sort();
    areas.dedup();

    if let Some(area) = query.area.as_deref() {
        positions.retain(|p| p.area.as_deref() == Some(area));
    }
    positions.truncate(limit);

    Ok(envelope(serde_json::json!({
        "positions": positions,
        "areas": areas,
        "eventId": event_id,
    })))
}

/// POST /api/events/:id/positions — create one position.
pub async fn create_position(
    State(app): State<AppState>,
    Path(event_id): Path<String>,
    Json(body): Json<NewPosition>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let store = app.store.clone();
    let position = blocking(move || store.create_position(&event_id, &body)).await?;
    tracing::info!(id = %position.id, number = position.position_number, "position created");
    Ok((StatusCode::CREATED, envelope(position)))
}

/// PUT /api/events/:id/positions/:position_id — update name, area,
/// description, sequence or active flag.
pub async fn update_position(
    State(app): State<AppState>,
    Path((event_id, position_id)): Path<(String, String)>,
    Json(body): Json<PositionUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    validate_event_id(&event_id)?;
    let store = app.store.clone();
    let position =
        blocking(move || store.update_position(&event_id, &position_id, &body)).await?;
    Ok(envelope(position))
}
