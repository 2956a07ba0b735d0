//! Route definitions for mirrored executions.

use axum::routing::get;
use axum::Router;

use crate::handlers::execution;
use crate::state::AppState;

/// Routes mounted at `/executions`.
///
/// ```text
/// GET    /            -> list (paginated, filterable)
/// POST   /            -> create (record a mirrored run)
/// DELETE /            -> delete_many (same filters as list)
/// GET    /export      -> export
/// GET    /{id}        -> get_by_id
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(execution::list)
                .post(execution::create)
                .delete(execution::delete_many),
        )
        .route("/export", get(execution::export))
        .route(
            "/{id}",
            get(execution::get_by_id).delete(execution::delete),
        )
}
