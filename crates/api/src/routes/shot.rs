//! Route definitions for the `/shots` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{generation, shot, take};
use crate::state::AppState;

/// Routes mounted at `/shots`.
///
/// ```text
/// GET    /{id}                            -> get_by_id
/// PUT    /{id}                            -> update (prompt)
/// DELETE /{id}                            -> delete (re-indexes the scene)
/// PUT    /{id}/keyframe                   -> set_keyframe
/// POST   /{id}/acknowledge-error          -> acknowledge_error
///
/// GET    /{shot_id}/takes                 -> list_by_shot
/// POST   /{shot_id}/takes                 -> record (manual ledger entry)
/// POST   /{shot_id}/takes/{take_id}/select -> select main take
///
/// POST   /{id}/animate                    -> dispatch animate job (202)
/// POST   /{id}/bridge                     -> dispatch bridge job (202)
/// POST   /{id}/cancel                     -> cancel in-flight job (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(shot::get_by_id).put(shot::update).delete(shot::delete),
        )
        .route("/{id}/keyframe", put(shot::set_keyframe))
        .route("/{id}/acknowledge-error", post(shot::acknowledge_error))
        .route(
            "/{shot_id}/takes",
            get(take::list_by_shot).post(take::record),
        )
        .route("/{shot_id}/takes/{take_id}/select", post(take::select))
        .route("/{id}/animate", post(generation::animate))
        .route("/{id}/bridge", post(generation::bridge))
        .route("/{id}/cancel", post(generation::cancel))
}
