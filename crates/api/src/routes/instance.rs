//! Route definitions for registered instances.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::instance;
use crate::state::AppState;

/// Routes mounted at `/instances`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /export      -> export
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// POST   /{id}/test   -> test_connection
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(instance::list).post(instance::create))
        .route("/export", get(instance::export))
        .route(
            "/{id}",
            get(instance::get_by_id)
                .put(instance::update)
                .delete(instance::delete),
        )
        .route("/{id}/test", post(instance::test_connection))
}
