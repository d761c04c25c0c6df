//! Handlers for the take ledger.
//!
//! Takes are listed and recorded under their shot
//! (`/shots/{shot_id}/takes`); selection and deletion address the take
//! directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinestudio_core::types::DbId;
use cinestudio_db::models::shot::Shot;
use cinestudio_db::models::take::Take;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /shots/{shot_id}/takes`.
///
/// Manual entry into the ledger, e.g. an externally produced clip.
#[derive(Debug, Deserialize)]
pub struct RecordTakeRequest {
    pub video_path: String,
    #[serde(default)]
    pub prompt_used: String,
}

/// GET /api/v1/shots/{shot_id}/takes
pub async fn list_by_shot(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Take>>>> {
    let takes = state.engine.list_takes(shot_id).await?;
    Ok(Json(DataResponse { data: takes }))
}

/// POST /api/v1/shots/{shot_id}/takes
pub async fn record(
    State(state): State<AppState>,
    Path(shot_id): Path<DbId>,
    Json(input): Json<RecordTakeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Take>>)> {
    let take = state
        .engine
        .record_take(shot_id, &input.video_path, &input.prompt_used)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: take })))
}

/// POST /api/v1/shots/{shot_id}/takes/{take_id}/select
///
/// Promote a take to the shot's main selection. Idempotent; returns the
/// updated shot.
pub async fn select(
    State(state): State<AppState>,
    Path((shot_id, take_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = state.engine.select_main(shot_id, take_id).await?;
    Ok(Json(DataResponse { data: shot }))
}

/// DELETE /api/v1/takes/{id}
///
/// Remove a take from the ledger. Deleting the main take clears the shot's
/// selection; the updated shot is returned so clients can refresh in place.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = state.engine.delete_take(id).await?;
    Ok(Json(DataResponse { data: shot }))
}
