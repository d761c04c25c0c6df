pub mod health;
pub mod project;
pub mod scene;
pub mod shot;
pub mod take;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                list, create
/// /projects/{id}                           get, update, delete
/// /projects/{project_id}/scenes            list, create
///
/// /scenes/{id}                             get, update, delete
/// /scenes/{scene_id}/shots                 list, append
/// /scenes/{scene_id}/shots/order           reorder (PUT)
/// /scenes/{scene_id}/playlist              main takes in order (GET)
///
/// /shots/{id}                              get, update, delete
/// /shots/{id}/keyframe                     set keyframe (PUT)
/// /shots/{id}/acknowledge-error            dismiss failure (POST)
/// /shots/{shot_id}/takes                   list, record
/// /shots/{shot_id}/takes/{take_id}/select  promote main take (POST)
/// /shots/{id}/animate                      dispatch animate (POST, 202)
/// /shots/{id}/bridge                       dispatch bridge (POST, 202)
/// /shots/{id}/cancel                       cancel job (POST, 202)
///
/// /takes/{id}                              delete
/// /takes/{id}/stitch                       dispatch stitch (POST, 202)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/scenes", scene::router())
        .nest("/shots", shot::router())
        .nest("/takes", take::router())
}
