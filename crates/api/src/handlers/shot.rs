//! Handlers for the `/shots` resource and the scene-scoped shot sequence.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinestudio_core::types::DbId;
use cinestudio_core::CoreError;
use cinestudio_db::models::shot::{CreateShot, Shot, UpdateShot};
use cinestudio_db::repositories::{SceneRepo, ShotRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /scenes/{scene_id}/shots/order`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Every shot of the scene, in the desired order.
    pub shot_ids: Vec<DbId>,
}

/// Request body for `PUT /shots/{id}/keyframe`.
#[derive(Debug, Deserialize)]
pub struct KeyframeRequest {
    pub keyframe_path: String,
}

/// POST /api/v1/scenes/{scene_id}/shots
///
/// Append a shot at the end of the scene's sequence. With no prompt given,
/// the shot is seeded from the scene's master context.
pub async fn create(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(input): Json<CreateShot>,
) -> AppResult<(StatusCode, Json<DataResponse<Shot>>)> {
    let shot = state.engine.append_shot(scene_id, input.prompt).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: shot })))
}

/// GET /api/v1/scenes/{scene_id}/shots
pub async fn list_by_scene(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Shot>>>> {
    SceneRepo::find_by_id(&state.pool, scene_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "scene",
            id: scene_id,
        }))?;

    let shots = ShotRepo::list_by_scene(&state.pool, scene_id).await?;
    Ok(Json(DataResponse { data: shots }))
}

/// PUT /api/v1/scenes/{scene_id}/shots/order
///
/// Apply a full permutation of the scene's shots. Rejects partial or foreign
/// lists with 422 and returns the scene's shots in their new order.
pub async fn reorder(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<Json<DataResponse<Vec<Shot>>>> {
    let shots = state.engine.reorder(scene_id, &input.shot_ids).await?;
    Ok(Json(DataResponse { data: shots }))
}

/// GET /api/v1/shots/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = ShotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "shot", id }))?;
    Ok(Json(DataResponse { data: shot }))
}

/// PUT /api/v1/shots/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShot>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = ShotRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "shot", id }))?;
    Ok(Json(DataResponse { data: shot }))
}

/// DELETE /api/v1/shots/{id}
///
/// Delete the shot and its takes; subsequent shots close the index gap.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.engine.delete_shot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/shots/{id}/keyframe
pub async fn set_keyframe(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<KeyframeRequest>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = state.engine.assign_keyframe(id, &input.keyframe_path).await?;
    Ok(Json(DataResponse { data: shot }))
}

/// POST /api/v1/shots/{id}/acknowledge-error
///
/// Dismiss a failed generation, returning the shot to a workable state.
pub async fn acknowledge_error(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Shot>>> {
    let shot = state.engine.acknowledge_error(id).await?;
    Ok(Json(DataResponse { data: shot }))
}
