//! Route definitions for the `/scenes` resource.
//!
//! The shot sequence, its ordering, and the playlist are scene-scoped.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{scene, shot};
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
///
/// GET    /{scene_id}/shots          -> list_by_scene
/// POST   /{scene_id}/shots          -> create (append at tail)
/// PUT    /{scene_id}/shots/order    -> reorder (full permutation)
///
/// GET    /{scene_id}/playlist       -> playlist (main takes in order)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(scene::get_by_id)
                .put(scene::update)
                .delete(scene::delete),
        )
        .route(
            "/{scene_id}/shots",
            get(shot::list_by_scene).post(shot::create),
        )
        .route("/{scene_id}/shots/order", put(shot::reorder))
        .route("/{scene_id}/playlist", get(scene::playlist))
}
