//! Handlers for the `/scenes` resource.
//!
//! Scenes are created under projects (`/projects/{project_id}/scenes`); the
//! shot sequence and the playlist live under `/scenes/{scene_id}/...`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use cinestudio_core::types::DbId;
use cinestudio_core::CoreError;
use cinestudio_db::models::scene::{CreateScene, Scene, UpdateScene};
use cinestudio_db::models::take::PlaylistEntry;
use cinestudio_db::repositories::{ProjectRepo, SceneRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/scenes
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateScene>,
) -> AppResult<(StatusCode, Json<DataResponse<Scene>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: project_id,
        }))?;

    let scene = SceneRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: scene })))
}

/// GET /api/v1/projects/{project_id}/scenes
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Scene>>>> {
    ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "project",
            id: project_id,
        }))?;

    let scenes = SceneRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: scenes }))
}

/// GET /api/v1/scenes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = SceneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "scene", id }))?;
    Ok(Json(DataResponse { data: scene }))
}

/// PUT /api/v1/scenes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScene>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = SceneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "scene", id }))?;
    Ok(Json(DataResponse { data: scene }))
}

/// DELETE /api/v1/scenes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = SceneRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "scene", id }))
    }
}

/// GET /api/v1/scenes/{scene_id}/playlist
///
/// The playable sequence for a scene: each shot's main take in order.
/// Shots without a main selection are skipped.
pub async fn playlist(
    State(state): State<AppState>,
    Path(scene_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PlaylistEntry>>>> {
    let entries = state.engine.playlist(scene_id).await?;
    Ok(Json(DataResponse { data: entries }))
}
