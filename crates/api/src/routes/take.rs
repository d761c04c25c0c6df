//! Route definitions for the `/takes` resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::{generation, take};
use crate::state::AppState;

/// Routes mounted at `/takes`.
///
/// ```text
/// DELETE /{id}          -> delete (returns the updated shot)
/// POST   /{id}/stitch   -> dispatch stitch job (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(take::delete))
        .route("/{id}/stitch", post(generation::stitch))
}
