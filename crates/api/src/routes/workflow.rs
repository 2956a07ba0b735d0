//! Route definitions for mirrored workflows.

use axum::routing::get;
use axum::Router;

use crate::handlers::workflow;
use crate::state::AppState;

/// Routes mounted at `/workflows`.
///
/// ```text
/// GET    /            -> list
/// POST   /            -> create
/// GET    /export      -> export
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workflow::list).post(workflow::create))
        .route("/export", get(workflow::export))
        .route(
            "/{id}",
            get(workflow::get_by_id)
                .put(workflow::update)
                .delete(workflow::delete),
        )
}
