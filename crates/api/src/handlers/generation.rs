//! Handlers for generation dispatch.
//!
//! Routes:
//! - `POST /shots/{id}/animate`  — animate the shot's keyframe into a take
//! - `POST /shots/{id}/bridge`   — generate a transition clip from the shot
//! - `POST /shots/{id}/cancel`   — cancel the in-flight job for the shot
//! - `POST /takes/{id}/stitch`   — extend the scene from a take's last frame
//!
//! Dispatch handlers return `202 Accepted`: the job runs detached and its
//! outcome lands on the shot (and the event bus), not in this response.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cinestudio_core::types::DbId;
use cinestudio_db::models::shot::Shot;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /shots/{id}/animate`.
#[derive(Debug, Default, Deserialize)]
pub struct AnimateRequest {
    /// Visual style, e.g. `"Cinematic"`. Defaults when omitted.
    pub style: Option<String>,
    /// Camera move name, e.g. `"Push In"`. Defaults when omitted.
    pub camera_move: Option<String>,
}

/// Request body for `POST /shots/{id}/bridge`.
#[derive(Debug, Deserialize, Validate)]
pub struct BridgeRequest {
    #[validate(length(min = 1, message = "transition_prompt must not be empty"))]
    pub transition_prompt: String,
    pub style: Option<String>,
    pub camera_move: Option<String>,
}

/// Request body for `POST /takes/{id}/stitch`.
#[derive(Debug, Deserialize, Validate)]
pub struct StitchRequest {
    /// Action text for the new shot; scene context is added automatically.
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
}

/// Response for dispatch endpoints: the claimed shot in `animating` state.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub shot: Shot,
}

/// POST /api/v1/shots/{id}/animate
pub async fn animate(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AnimateRequest>,
) -> AppResult<impl IntoResponse> {
    let shot = state
        .engine
        .animate(id, input.style.as_deref(), input.camera_move.as_deref())
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: DispatchResponse { shot },
        }),
    ))
}

/// POST /api/v1/shots/{id}/bridge
pub async fn bridge(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<BridgeRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let shot = state
        .engine
        .bridge(
            id,
            &input.transition_prompt,
            input.style.as_deref(),
            input.camera_move.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: DispatchResponse { shot },
        }),
    ))
}

/// POST /api/v1/shots/{id}/cancel
///
/// Returns 409 when no job is in flight for the shot.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.cancel_generation(id)?;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/takes/{id}/stitch
///
/// The new shot is created only when the derived keyframe is confirmed;
/// completion is announced as a `shot.stitched` event.
pub async fn stitch(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StitchRequest>,
) -> AppResult<StatusCode> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.engine.stitch(id, &input.prompt).await?;
    Ok(StatusCode::ACCEPTED)
}
