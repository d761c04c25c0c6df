//! Route definitions for the `/projects` resource.
//!
//! Also nests scene creation/listing under `/projects/{project_id}/scenes`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, scene};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
///
/// GET    /{project_id}/scenes       -> list_by_project
/// POST   /{project_id}/scenes       -> create
/// ```
pub fn router() -> Router<AppState> {
    let scene_routes = Router::new().route("/", get(scene::list_by_project).post(scene::create));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .nest("/{project_id}/scenes", scene_routes)
}
